use crate::core::io::document::ModelDocument;
use crate::core::io::pdb;
use crate::core::models::records::RecordSet;

/// The supported ways to feed a molecule into [`build_model`].
///
/// Every variant is adapted into the same intermediate [`RecordSet`] before
/// building, so the validation and perception pipeline is identical no matter
/// where the molecule came from.
///
/// [`build_model`]: crate::perception::build_model
#[derive(Debug, Clone)]
pub enum MoleculeSource {
    /// Fixed-column structure text (ATOM/HETATM/CONECT records).
    PdbText(String),
    /// A previously exported model document.
    Document(ModelDocument),
    /// Records assembled programmatically by the caller.
    Records(RecordSet),
}

impl MoleculeSource {
    /// Adapts the source into raw molecule records. Never fails: malformed
    /// lines in structure text are skipped during parsing, and the other
    /// variants already carry structured data.
    pub fn into_records(self) -> RecordSet {
        match self {
            Self::PdbText(text) => pdb::parse_records(&text),
            Self::Document(document) => document.into_records(),
            Self::Records(records) => records,
        }
    }
}

impl From<RecordSet> for MoleculeSource {
    fn from(records: RecordSet) -> Self {
        Self::Records(records)
    }
}

impl From<ModelDocument> for MoleculeSource {
    fn from(document: ModelDocument) -> Self {
        Self::Document(document)
    }
}
