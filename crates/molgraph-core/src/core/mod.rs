//! # Core Module
//!
//! This module provides the stateless foundation of the library: the data
//! structures that represent an enriched molecular graph, the file-format
//! readers and writers built on top of the model's output contract, and pure
//! utility functions for geometry and chemical lookup tables.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, bonds, rings, ingest
//!   records, and the `MolecularModel` aggregate with its derived views
//! - **File I/O** ([`io`]) - Fixed-column structure-file parsing plus the
//!   writer family (structure files, component dictionaries, graph exchange,
//!   tabular and document serialization)
//! - **Utilities** ([`utils`]) - Plane-fitting geometry and static per-element
//!   chemical tables
//!
//! Everything in this layer is deterministic and free of construction logic;
//! model building and ring/aromaticity perception live in
//! [`crate::perception`].

pub mod io;
pub mod models;
pub mod utils;
