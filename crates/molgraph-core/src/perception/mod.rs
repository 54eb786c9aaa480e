//! The perception pipeline: from raw molecule records to an enriched model.
//!
//! This module turns any [`MoleculeSource`] into a validated
//! [`MolecularModel`](crate::core::models::molecule::MolecularModel): atoms
//! are ingested and scaled, connectivity is symmetrized and checked, bonds
//! are derived, and rings are enumerated and classified for aromaticity.
//! [`build_model`] is the main entry point; the individual stages are exposed
//! for callers that need finer control.

pub mod aromaticity;
pub mod builder;
pub mod error;
pub mod rings;
pub(crate) mod search;
pub mod source;

pub use aromaticity::is_ring_aromatic;
pub use builder::{BuildOptions, ModelBuilder, build_model};
pub use error::ModelBuildError;
pub use rings::find_rings;
pub use source::MoleculeSource;
