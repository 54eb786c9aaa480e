use super::topology::BondOrder;
use nalgebra::Point3;

/// One atom as described by a molecule source, before any validation.
///
/// Records are the canonical ingest currency: every source adapter produces
/// them, and the graph builder consumes nothing else. Coordinates are carried
/// in the raw input convention (Ångström); the builder converts to nanometers.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// The source-assigned serial number; becomes the atom's stable id.
    pub serial: usize,
    /// Whether the record was tagged as a hetero record.
    pub hetero: bool,
    /// The display label of the atom.
    pub label: String,
    /// The residue/group label.
    pub group: String,
    /// The residue sequence number; consumed from fixed-column sources but not
    /// retained by the model.
    pub residue_seq: isize,
    /// The source coordinates in Ångström.
    pub coord: Point3<f64>,
    /// The element symbol, normalized to uppercase. May be empty.
    pub element: String,
    /// Optimized coordinates in Ångström, carried only by document sources.
    pub optimized_coord: Option<Point3<f64>>,
    /// The partial charge, carried only by document sources.
    pub partial_charge: Option<f64>,
    /// The raw symmetry equivalence-group tag, carried only by document
    /// sources.
    pub equivalence_group: Option<i32>,
}

impl AtomRecord {
    /// Creates a record with the fields every source provides; the
    /// document-only extras default to absent.
    pub fn new(serial: usize, label: &str, group: &str, element: &str, coord: Point3<f64>) -> Self {
        Self {
            serial,
            hetero: false,
            label: label.to_string(),
            group: group.to_string(),
            residue_seq: 0,
            coord,
            element: element.to_string(),
            optimized_coord: None,
            partial_charge: None,
            equivalence_group: None,
        }
    }
}

/// One connectivity reference set: an owner atom and the neighbors it names.
///
/// Fixed-column sources cap the neighbor list at four per record and repeat
/// records to express higher connectivity; other sources may list any number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectivityRecord {
    pub serial: usize,
    pub neighbors: Vec<usize>,
}

impl ConnectivityRecord {
    pub fn new(serial: usize, neighbors: Vec<usize>) -> Self {
        Self { serial, neighbors }
    }
}

/// Optional per-bond attributes a document source carries for an unordered
/// atom-id pair. Applied to the matching derived bond after graph
/// construction; pairs that match no derived bond are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct BondRecord {
    pub atom1: usize,
    pub atom2: usize,
    /// The measured bond length in nanometers.
    pub length: Option<f64>,
    pub order: Option<BondOrder>,
}

/// The complete canonical output of one molecule source adapter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    pub atoms: Vec<AtomRecord>,
    pub connectivity: Vec<ConnectivityRecord>,
    /// Bond attributes from document sources; empty for structure-text input.
    pub bond_extras: Vec<BondRecord>,
    /// The molecule name; when absent the builder falls back to the first
    /// atom's group label.
    pub name: Option<String>,
    /// The net charge of the molecule, if the source states one.
    pub net_charge: Option<i32>,
}
