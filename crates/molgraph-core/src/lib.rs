//! # Molgraph Core Library
//!
//! A library for turning raw small-molecule structure records into an enriched,
//! internally-consistent molecular graph model: atoms with normalized symmetric
//! connectivity, a deduplicated bond list, rings detected in the connectivity
//! graph, and an aromaticity classification per ring.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict two-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models
//!   ([`MolecularModel`](core::models::molecule::MolecularModel) and its atom,
//!   bond, and ring types), the file-format readers and writers that consume the
//!   model's output contract, and pure geometric/chemical lookup utilities.
//!
//! - **[`perception`]: The Logic Core.** This layer builds models from tagged
//!   molecule sources. It validates and symmetrizes connectivity, enumerates
//!   rings per bond via iterative shortest-path search with dynamically mutated
//!   edge weights, and classifies ring aromaticity from planarity and per-element
//!   valence rules. [`perception::build_model`] is the main entry point.
//!
//! The data flow is strictly linear: raw input → graph building → ring
//! perception → aromaticity classification → [`MolecularModel`] → writers.
//! Once built, the model is read-only except for a handful of optional
//! additive passes (the united-atom index, bond-length measurement, and bond
//! order inference), which never mutate the primary atom/bond/ring tables.
//!
//! [`MolecularModel`]: core::models::molecule::MolecularModel

pub mod core;
pub mod perception;
