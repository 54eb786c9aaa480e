use thiserror::Error;

/// Errors raised while turning raw molecule records into a validated model.
///
/// Both variants are fatal: the builder returns no partial model. The payload
/// lists every offending atom so a caller can report the full problem in one
/// pass over the source data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelBuildError {
    /// Connectivity entries of known atoms pointed at serials that no atom
    /// record declared. Each pair is `(referencing atom, unknown serial)`.
    #[error("Connectivity references unknown atoms: {references:?}")]
    DanglingConnectivity { references: Vec<(usize, usize)> },

    /// A molecule with more than one atom contained atoms without any
    /// connectivity, which the builder was asked to treat as an input defect.
    #[error("Atoms carry no connectivity in a multi-atom molecule: {atom_ids:?}")]
    MissingConnectivity { atom_ids: Vec<usize> },
}
