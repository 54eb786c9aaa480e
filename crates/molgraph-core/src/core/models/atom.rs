use nalgebra::Point3;

/// The equivalence-group tag carried by atoms that belong to no symmetry group.
///
/// Atoms tagged with this value always receive their own unique class during
/// canonicalization instead of sharing one.
pub const NO_EQUIVALENCE_GROUP: i32 = -1;

/// Represents an atom in a molecular graph with its properties and derived ordinals.
///
/// This struct encapsulates everything the model knows about one atom: its
/// display label, normalized element code, geometry, and the normalized
/// connectivity list maintained by the graph builder. Atoms do not store their
/// own id; they are keyed by their stable source-assigned integer id in the
/// model's atom table.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The display label of the atom (e.g., "C1", "HW2").
    pub label: String,
    /// The element type code, normalized to uppercase (e.g., "C", "N", "CL").
    /// May be empty when the source carried no element column.
    pub element: String,
    /// The residue/group label from the source record (e.g., "UNL").
    pub group: String,
    /// Whether the source record was tagged as a hetero record.
    pub hetero: bool,
    /// The source-geometry coordinates in nanometers.
    pub coord: Point3<f64>,
    /// Independently-computed optimized coordinates in nanometers, if present.
    pub optimized_coord: Option<Point3<f64>>,
    /// The partial atomic charge in elementary charge units, if known.
    pub partial_charge: Option<f64>,
    /// The serialization ordinal used by writers.
    pub index: usize,
    /// The coarse-grained ordinal, present only if the atom survives the
    /// united-atom pass.
    pub uindex: Option<usize>,
    /// Sorted, deduplicated ids of the neighboring atoms. Symmetric across the
    /// model: if this atom lists `b`, atom `b` lists this atom.
    pub conn: Vec<usize>,
    /// The raw symmetry equivalence-group tag ([`NO_EQUIVALENCE_GROUP`] when
    /// the atom belongs to no group).
    pub equivalence_group: i32,
}

impl Atom {
    /// Creates a new `Atom` with default values for the optional fields.
    ///
    /// The constructor initializes an atom with the provided label, group, and
    /// nanometer coordinates; connectivity and the derived ordinals are filled
    /// in by the graph builder and the additive passes.
    ///
    /// # Arguments
    ///
    /// * `label` - The display label of the atom.
    /// * `group` - The residue/group label.
    /// * `coord` - The source coordinates in nanometers.
    pub fn new(label: &str, group: &str, coord: Point3<f64>) -> Self {
        Self {
            label: label.to_string(),
            element: String::new(),
            group: group.to_string(),
            hetero: false,
            coord,
            optimized_coord: None,
            partial_charge: None,
            index: 0,
            uindex: None,
            conn: Vec::new(),
            equivalence_group: NO_EQUIVALENCE_GROUP,
        }
    }

    /// Returns the coordinates geometry consumers should use: the optimized
    /// coordinates when present, falling back to the source coordinates.
    pub fn effective_coord(&self) -> Point3<f64> {
        self.optimized_coord.unwrap_or(self.coord)
    }

    /// Returns `true` if the atom's element code is hydrogen.
    pub fn is_hydrogen(&self) -> bool {
        self.element == "H"
    }

    /// Returns the number of neighbors in the normalized connectivity list.
    pub fn connectivity_count(&self) -> usize {
        self.conn.len()
    }
}
