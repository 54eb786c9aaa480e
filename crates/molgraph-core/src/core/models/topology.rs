use crate::core::utils::elements::double_bond_cutoff;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The bond-order classification inferred from empirical bond-length cutoffs.
///
/// Only the single/double distinction is modeled: the cutoff table that drives
/// the inference covers a handful of element pairs, and every pair outside it
/// classifies as single.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BondOrder {
    Single,
    Double,
}

impl Default for BondOrder {
    fn default() -> Self {
        BondOrder::Single
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid bond order string")]
pub struct ParseBondOrderError;

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "s" | "single" => Ok(Self::Single),
            "2" | "d" | "double" => Ok(Self::Double),
            _ => Err(ParseBondOrderError),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Single => "Single",
                Self::Double => "Double",
            }
        )
    }
}

/// Classifies a bond as single or double from its measured length.
///
/// The empirical nanometer cutoffs are keyed by the unordered element-type
/// pair; a measured length strictly below the pair's cutoff classifies as
/// double. Pairs absent from the cutoff table always classify as single.
///
/// # Arguments
///
/// * `length_nm` - The measured bond length in nanometers.
/// * `element1` - The element code of the first endpoint.
/// * `element2` - The element code of the second endpoint.
pub fn infer_bond_order(length_nm: f64, element1: &str, element2: &str) -> BondOrder {
    match double_bond_cutoff(element1, element2) {
        Some(cutoff) if length_nm < cutoff => BondOrder::Double,
        _ => BondOrder::Single,
    }
}

/// Represents a bond between two atoms in the molecular graph.
///
/// A bond is an unordered pair of atom ids; the graph builder stores the
/// smaller id first and records each pair exactly once. The optional fields
/// are derived later by the additive passes and the exporter-facing helpers,
/// never during graph construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    /// Id of the first atom (always the smaller of the pair).
    pub atom1_id: usize,
    /// Id of the second atom.
    pub atom2_id: usize,
    /// The measured bond length in nanometers, if known.
    pub length: Option<f64>,
    /// The inferred bond order, if classification has been performed.
    pub order: Option<BondOrder>,
    /// Set to `Some(true)` by the united-atom pass for bonds whose endpoints
    /// both survive coarse-graining; absent otherwise.
    pub united: Option<bool>,
}

impl Bond {
    pub fn new(atom1_id: usize, atom2_id: usize) -> Self {
        Self {
            atom1_id,
            atom2_id,
            length: None,
            order: None,
            united: None,
        }
    }

    /// Returns `true` if the bond involves the given atom id.
    pub fn contains(&self, atom_id: usize) -> bool {
        self.atom1_id == atom_id || self.atom2_id == atom_id
    }

    /// Returns the endpoints as the canonical `(smaller, larger)` pair.
    pub fn key(&self) -> (usize, usize) {
        (
            self.atom1_id.min(self.atom2_id),
            self.atom1_id.max(self.atom2_id),
        )
    }
}
