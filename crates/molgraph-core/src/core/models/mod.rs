//! # Core Models Module
//!
//! This module contains the fundamental data structures used to represent a
//! small molecule as an enriched graph, providing the foundation for model
//! building, ring perception, and every downstream writer.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom representation with coordinates, element type,
//!   connectivity, and optional derived ordinals
//! - [`topology`] - Bonds and the single/double bond-order classification
//! - [`ring`] - Simple cycles detected in the connectivity graph, with their
//!   aromaticity flag
//! - [`records`] - The canonical ingest records every molecule source adapter
//!   produces
//! - [`molecule`] - The `MolecularModel` aggregate owning the atom table, bond
//!   list, and ring table, plus its additive derived views
//!
//! Atoms are keyed by their stable source-assigned integer id throughout; the
//! model stores them in an ordered table so every iteration order is
//! deterministic.

pub mod atom;
pub mod molecule;
pub mod records;
pub mod ring;
pub mod topology;
