//! Shared utilities for the core library.
//!
//! Small, dependency-light helpers used across the perception pipeline and
//! the writers: element lookup tables and plane geometry.

pub mod elements;
pub mod geometry;
