//! Readers and writers for the supported molecule formats.
//!
//! Two formats read back in: the fixed-column structure text (`pdb`) and the
//! serde model document (`document`); every other module only renders a built
//! model outward. Writers share the [`ModelWriter`](traits::ModelWriter)
//! interface where the format always applies; the graph-exchange writer
//! instead reports an [`ExportOutcome`] because it has hard data
//! prerequisites.

pub mod ccd;
pub mod document;
pub mod g96;
pub mod lgf;
pub mod pdb;
pub mod tables;
pub mod traits;

/// The result of running a writer that may decline a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The writer produced output.
    Written,
    /// The writer declined the model without producing output; the payload
    /// names the missing data.
    NotApplicable(String),
}
