use crate::core::models::atom::NO_EQUIVALENCE_GROUP;
use crate::core::models::molecule::MolecularModel;
use crate::core::models::records::{AtomRecord, BondRecord, ConnectivityRecord, RecordSet};
use crate::core::models::topology::BondOrder;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scale factor from document coordinates (nanometers) to raw record
/// coordinates (Ångström).
const NM_TO_ANGSTROM: f64 = 10.0;

/// Errors raised while encoding or decoding a model document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("TOML deserialization error: {0}")]
    Deserialize(#[from] toml::de::Error),
}

/// One atom in a model document. Entries carry their id explicitly, so the
/// document is an ordinary list rather than an integer-keyed table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomEntry {
    pub id: usize,
    pub label: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub element: String,
    #[serde(default)]
    pub hetero: bool,
    /// Coordinates in nanometers.
    pub coord: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimized_coord: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_charge: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equivalence_group: Option<i32>,
}

/// One bond in a model document, carrying the derived attributes so a
/// document reader does not need to recompute them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondEntry {
    pub atom1: usize,
    pub atom2: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<BondOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub united: Option<bool>,
}

/// One ring in a model document. Informational on ingest: the build pipeline
/// always recomputes rings from connectivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingEntry {
    pub atoms: Vec<usize>,
    #[serde(default)]
    pub aromatic: bool,
}

/// The serialized form of a molecular model.
///
/// Documents round-trip the model's ingestable state: atoms with their
/// optional enrichments, bonds with their derived attributes, and the ring
/// table. Feeding a document back through the pipeline rebuilds the same
/// graph; bond lengths and orders stated by the document take precedence over
/// re-derivation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_charge: Option<i32>,
    #[serde(default)]
    pub atoms: Vec<AtomEntry>,
    #[serde(default)]
    pub bonds: Vec<BondEntry>,
    #[serde(default)]
    pub rings: Vec<RingEntry>,
}

impl ModelDocument {
    /// Captures a built model as a document.
    pub fn from_model(model: &MolecularModel) -> Self {
        let atoms = model
            .atoms()
            .map(|(id, atom)| AtomEntry {
                id,
                label: atom.label.clone(),
                group: atom.group.clone(),
                element: atom.element.clone(),
                hetero: atom.hetero,
                coord: [atom.coord.x, atom.coord.y, atom.coord.z],
                optimized_coord: atom.optimized_coord.map(|c| [c.x, c.y, c.z]),
                partial_charge: atom.partial_charge,
                equivalence_group: (atom.equivalence_group != NO_EQUIVALENCE_GROUP)
                    .then_some(atom.equivalence_group),
            })
            .collect();

        let bonds = model
            .bonds()
            .iter()
            .map(|bond| BondEntry {
                atom1: bond.atom1_id,
                atom2: bond.atom2_id,
                length: bond.length,
                order: bond.order,
                united: bond.united,
            })
            .collect();

        let rings = model
            .rings()
            .iter()
            .map(|ring| RingEntry {
                atoms: ring.atom_ids.clone(),
                aromatic: ring.aromatic,
            })
            .collect();

        Self {
            name: (!model.name().is_empty()).then(|| model.name().to_string()),
            net_charge: model.net_charge(),
            atoms,
            bonds,
            rings,
        }
    }

    /// Adapts the document into raw molecule records for the build pipeline.
    ///
    /// Coordinates are scaled back to the raw record convention, bonds become
    /// one-directional connectivity references (the builder mirrors them),
    /// and stated bond lengths and orders travel as bond attributes. Rings
    /// are dropped here; the pipeline recomputes them.
    pub fn into_records(self) -> RecordSet {
        let mut records = RecordSet {
            name: self.name,
            net_charge: self.net_charge,
            ..RecordSet::default()
        };

        for entry in self.atoms {
            let coord = Point3::new(entry.coord[0], entry.coord[1], entry.coord[2]);
            let mut record = AtomRecord::new(
                entry.id,
                &entry.label,
                &entry.group,
                &entry.element,
                coord * NM_TO_ANGSTROM,
            );
            record.hetero = entry.hetero;
            record.optimized_coord = entry
                .optimized_coord
                .map(|c| Point3::new(c[0], c[1], c[2]) * NM_TO_ANGSTROM);
            record.partial_charge = entry.partial_charge;
            record.equivalence_group = entry.equivalence_group;
            records.atoms.push(record);
        }

        for entry in self.bonds {
            records
                .connectivity
                .push(ConnectivityRecord::new(entry.atom1, vec![entry.atom2]));
            if entry.length.is_some() || entry.order.is_some() {
                records.bond_extras.push(BondRecord {
                    atom1: entry.atom1,
                    atom2: entry.atom2,
                    length: entry.length,
                    order: entry.order,
                });
            }
        }

        records
    }

    /// Renders the document as TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, DocumentError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Parses a document from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or does not match the
    /// document shape.
    pub fn from_toml_str(text: &str) -> Result<Self, DocumentError> {
        Ok(toml::from_str(text)?)
    }
}
