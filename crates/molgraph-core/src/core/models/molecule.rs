use super::atom::{Atom, NO_EQUIVALENCE_GROUP};
use super::ring::Ring;
use super::topology::{Bond, BondOrder, infer_bond_order};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// The enriched molecular graph produced by the perception pipeline.
///
/// The model owns the atom table, bond list, and ring table as one consistent
/// aggregate and is the single source of truth for every writer. Atoms are
/// keyed by their stable source-assigned integer id in an ordered table, so
/// all iteration is deterministic.
///
/// Lifecycle: atoms and bonds are created once during graph building; rings
/// are computed once, immediately after the graph is validated. After that
/// the model is read-only except for the three additive passes
/// ([`unite_atoms`](Self::unite_atoms),
/// [`measure_bond_lengths`](Self::measure_bond_lengths), and
/// [`infer_bond_orders`](Self::infer_bond_orders)), which only fill optional
/// derived fields and never remove or reorder the primary tables.
#[derive(Debug, Clone, PartialEq)]
pub struct MolecularModel {
    name: String,
    net_charge: Option<i32>,
    atoms: BTreeMap<usize, Atom>,
    bonds: Vec<Bond>,
    rings: Vec<Ring>,
}

impl MolecularModel {
    pub(crate) fn new(
        name: String,
        net_charge: Option<i32>,
        atoms: BTreeMap<usize, Atom>,
        bonds: Vec<Bond>,
    ) -> Self {
        Self {
            name,
            net_charge,
            atoms,
            bonds,
            rings: Vec::new(),
        }
    }

    pub(crate) fn set_rings(&mut self, rings: Vec<Ring>) {
        self.rings = rings;
    }

    /// The molecule name (the source-provided name, falling back to the first
    /// atom's group label).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The net charge of the molecule, if the source stated one.
    pub fn net_charge(&self) -> Option<i32> {
        self.net_charge
    }

    /// Returns the atom with the given id.
    pub fn atom(&self, atom_id: usize) -> Option<&Atom> {
        self.atoms.get(&atom_id)
    }

    /// Iterates over `(id, atom)` pairs in ascending id order.
    pub fn atoms(&self) -> impl Iterator<Item = (usize, &Atom)> {
        self.atoms.iter().map(|(&id, atom)| (id, atom))
    }

    /// Iterates over atom ids in ascending order.
    pub fn atom_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.atoms.keys().copied()
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// Returns the id of the atom carrying the given serialization ordinal.
    pub fn id_by_index(&self, index: usize) -> Option<usize> {
        self.atoms
            .iter()
            .find(|(_, atom)| atom.index == index)
            .map(|(&id, _)| id)
    }

    /// Returns `true` if every atom carries optimized coordinates.
    pub fn has_optimized_coords(&self) -> bool {
        !self.atoms.is_empty() && self.atoms.values().all(|a| a.optimized_coord.is_some())
    }

    /// Returns `true` if every atom carries a partial charge.
    pub fn has_partial_charges(&self) -> bool {
        !self.atoms.is_empty() && self.atoms.values().all(|a| a.partial_charge.is_some())
    }

    /// Returns `true` if the united-atom pass has assigned coarse-grained
    /// ordinals.
    pub fn is_united(&self) -> bool {
        self.atoms.values().any(|a| a.uindex.is_some())
    }

    /// Derives the coarse-grained ("united-atom") index.
    ///
    /// Hydrogens are merged into their parent when the parent is a carbon
    /// carrying more than one hydrogen neighbor; a lone CH hydrogen stays
    /// explicit. Surviving atoms receive consecutive `uindex` ordinals
    /// starting at 1 in ascending id order, and every bond whose endpoints
    /// both survive is flagged safe under coarse-graining. The pass is purely
    /// additive: no primary atom, bond, or ring is removed or reordered.
    pub fn unite_atoms(&mut self) {
        let mut united_hydrogens: BTreeSet<usize> = BTreeSet::new();
        for atom in self.atoms.values() {
            if atom.element != "C" {
                continue;
            }
            let hydrogen_neighbors: Vec<usize> = atom
                .conn
                .iter()
                .copied()
                .filter(|id| self.atoms.get(id).is_some_and(|a| a.is_hydrogen()))
                .collect();
            if hydrogen_neighbors.len() > 1 {
                united_hydrogens.extend(hydrogen_neighbors);
            }
        }

        let mut next_uindex = 0;
        for (id, atom) in self.atoms.iter_mut() {
            if united_hydrogens.contains(id) {
                atom.uindex = None;
            } else {
                next_uindex += 1;
                atom.uindex = Some(next_uindex);
            }
        }

        for bond in self.bonds.iter_mut() {
            if !united_hydrogens.contains(&bond.atom1_id)
                && !united_hydrogens.contains(&bond.atom2_id)
            {
                bond.united = Some(true);
            }
        }
    }

    /// Computes the distance between a bond's endpoints from their effective
    /// coordinates (optimized preferred), in nanometers.
    pub fn geometric_bond_length(&self, bond: &Bond) -> Option<f64> {
        let atom1 = self.atoms.get(&bond.atom1_id)?;
        let atom2 = self.atoms.get(&bond.atom2_id)?;
        Some((atom1.effective_coord() - atom2.effective_coord()).norm())
    }

    /// Fills each bond's measured length from the endpoints' effective
    /// coordinates. Lengths already supplied by the source are kept.
    pub fn measure_bond_lengths(&mut self) {
        let lengths: Vec<Option<f64>> = self
            .bonds
            .iter()
            .map(|bond| self.geometric_bond_length(bond))
            .collect();
        for (bond, length) in self.bonds.iter_mut().zip(lengths) {
            if bond.length.is_none() {
                bond.length = length;
            }
        }
    }

    /// Fills each bond's inferred order from its measured length (falling back
    /// to the geometric length) and the endpoint element pair. Orders already
    /// supplied by the source are kept.
    pub fn infer_bond_orders(&mut self) {
        let orders: Vec<Option<BondOrder>> = self
            .bonds
            .iter()
            .map(|bond| {
                let length = bond.length.or_else(|| self.geometric_bond_length(bond))?;
                let atom1 = self.atoms.get(&bond.atom1_id)?;
                let atom2 = self.atoms.get(&bond.atom2_id)?;
                Some(infer_bond_order(length, &atom1.element, &atom2.element))
            })
            .collect();
        for (bond, order) in self.bonds.iter_mut().zip(orders) {
            if bond.order.is_none() {
                bond.order = order;
            }
        }
    }

    /// Maps every atom id to a canonical, densely-numbered equivalence class.
    ///
    /// Atoms sharing a raw equivalence-group tag share one class id, assigned
    /// in first-seen order over ascending atom ids; atoms tagged as ungrouped
    /// each receive their own unique class. The assignment is deterministic
    /// for a given model.
    pub fn equivalence_classes(&self) -> BTreeMap<usize, usize> {
        let mut classes = BTreeMap::new();
        let mut class_by_group: HashMap<i32, usize> = HashMap::new();
        let mut next_class = 0;

        for (&id, atom) in &self.atoms {
            let class = if atom.equivalence_group == NO_EQUIVALENCE_GROUP {
                let fresh = next_class;
                next_class += 1;
                fresh
            } else {
                *class_by_group
                    .entry(atom.equivalence_group)
                    .or_insert_with(|| {
                        let fresh = next_class;
                        next_class += 1;
                        fresh
                    })
            };
            classes.insert(id, class);
        }
        classes
    }

    /// Returns the ids of all atoms that lie in at least one aromatic ring.
    pub fn aromatic_atom_ids(&self) -> BTreeSet<usize> {
        self.rings
            .iter()
            .filter(|ring| ring.aromatic)
            .flat_map(|ring| ring.atom_ids.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn atom(label: &str, element: &str, coord: Point3<f64>) -> Atom {
        let mut atom = Atom::new(label, "UNL", coord);
        atom.element = element.to_string();
        atom
    }

    fn model_from_parts(entries: Vec<(usize, Atom)>, bond_pairs: &[(usize, usize)]) -> MolecularModel {
        let mut atoms: BTreeMap<usize, Atom> = BTreeMap::new();
        for (id, mut a) in entries {
            a.index = id;
            atoms.insert(id, a);
        }
        for &(a, b) in bond_pairs {
            if let Some(entry) = atoms.get_mut(&a) {
                entry.conn.push(b);
            }
            if let Some(entry) = atoms.get_mut(&b) {
                entry.conn.push(a);
            }
        }
        for a in atoms.values_mut() {
            a.conn.sort_unstable();
            a.conn.dedup();
        }
        let bonds = bond_pairs
            .iter()
            .map(|&(a, b)| Bond::new(a.min(b), a.max(b)))
            .collect();
        MolecularModel::new("UNL".to_string(), None, atoms, bonds)
    }

    /// Ethane-like fragment: two carbons, three hydrogens each.
    fn create_ethane_model() -> MolecularModel {
        let entries = vec![
            (1, atom("C1", "C", Point3::new(0.0, 0.0, 0.0))),
            (2, atom("C2", "C", Point3::new(0.153, 0.0, 0.0))),
            (3, atom("H1", "H", Point3::new(-0.036, 0.103, 0.0))),
            (4, atom("H2", "H", Point3::new(-0.036, -0.052, 0.089))),
            (5, atom("H3", "H", Point3::new(-0.036, -0.052, -0.089))),
            (6, atom("H4", "H", Point3::new(0.189, 0.103, 0.0))),
            (7, atom("H5", "H", Point3::new(0.189, -0.052, 0.089))),
            (8, atom("H6", "H", Point3::new(0.189, -0.052, -0.089))),
        ];
        let bonds = [(1, 2), (1, 3), (1, 4), (1, 5), (2, 6), (2, 7), (2, 8)];
        model_from_parts(entries, &bonds)
    }

    mod accessors {
        use super::*;

        #[test]
        fn counts_and_lookup_reflect_contents() {
            let model = create_ethane_model();
            assert_eq!(model.atom_count(), 8);
            assert_eq!(model.bond_count(), 7);
            assert_eq!(model.ring_count(), 0);
            assert!(model.atom(1).is_some());
            assert!(model.atom(99).is_none());
        }

        #[test]
        fn atoms_iterate_in_ascending_id_order() {
            let model = create_ethane_model();
            let ids: Vec<usize> = model.atom_ids().collect();
            assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        }

        #[test]
        fn id_by_index_finds_matching_atom() {
            let model = create_ethane_model();
            assert_eq!(model.id_by_index(2), Some(2));
            assert_eq!(model.id_by_index(42), None);
        }

        #[test]
        fn optional_data_flags_require_every_atom() {
            let mut model = create_ethane_model();
            assert!(!model.has_optimized_coords());
            assert!(!model.has_partial_charges());

            for (_, a) in model.atoms.iter_mut() {
                a.optimized_coord = Some(a.coord);
                a.partial_charge = Some(0.0);
            }
            assert!(model.has_optimized_coords());
            assert!(model.has_partial_charges());

            if let Some(a) = model.atoms.get_mut(&1) {
                a.partial_charge = None;
            }
            assert!(!model.has_partial_charges());
        }
    }

    mod united_atoms {
        use super::*;

        #[test]
        fn methyl_hydrogens_are_merged_into_their_carbons() {
            let mut model = create_ethane_model();
            model.unite_atoms();

            assert_eq!(model.atom(1).and_then(|a| a.uindex), Some(1));
            assert_eq!(model.atom(2).and_then(|a| a.uindex), Some(2));
            for id in 3..=8 {
                assert_eq!(model.atom(id).and_then(|a| a.uindex), None);
            }
            assert!(model.is_united());
        }

        #[test]
        fn lone_ch_hydrogen_survives() {
            // One carbon with a single hydrogen plus two heavy neighbors.
            let entries = vec![
                (1, atom("C1", "C", Point3::origin())),
                (2, atom("H1", "H", Point3::new(0.1, 0.0, 0.0))),
                (3, atom("O1", "O", Point3::new(0.0, 0.14, 0.0))),
                (4, atom("N1", "N", Point3::new(0.0, -0.14, 0.0))),
            ];
            let mut model = model_from_parts(entries, &[(1, 2), (1, 3), (1, 4)]);
            model.unite_atoms();

            assert_eq!(model.atom(1).and_then(|a| a.uindex), Some(1));
            assert_eq!(model.atom(2).and_then(|a| a.uindex), Some(2));
            assert_eq!(model.atom(3).and_then(|a| a.uindex), Some(3));
            assert_eq!(model.atom(4).and_then(|a| a.uindex), Some(4));
        }

        #[test]
        fn hydrogens_on_non_carbon_parents_are_never_merged() {
            // Water: two hydrogens on oxygen.
            let entries = vec![
                (1, atom("OW", "O", Point3::origin())),
                (2, atom("HW1", "H", Point3::new(0.096, 0.0, 0.0))),
                (3, atom("HW2", "H", Point3::new(-0.024, 0.093, 0.0))),
            ];
            let mut model = model_from_parts(entries, &[(1, 2), (1, 3)]);
            model.unite_atoms();

            assert_eq!(model.atom(1).and_then(|a| a.uindex), Some(1));
            assert_eq!(model.atom(2).and_then(|a| a.uindex), Some(2));
            assert_eq!(model.atom(3).and_then(|a| a.uindex), Some(3));
        }

        #[test]
        fn only_bonds_between_survivors_are_flagged() {
            let mut model = create_ethane_model();
            model.unite_atoms();

            for bond in model.bonds() {
                if bond.key() == (1, 2) {
                    assert_eq!(bond.united, Some(true));
                } else {
                    assert_eq!(bond.united, None);
                }
            }
        }

        #[test]
        fn uindex_ordinals_are_consecutive_in_id_order() {
            // Mixed molecule where a high-id heavy atom follows merged hydrogens.
            let entries = vec![
                (1, atom("C1", "C", Point3::origin())),
                (2, atom("H1", "H", Point3::new(0.1, 0.0, 0.0))),
                (3, atom("H2", "H", Point3::new(-0.1, 0.0, 0.0))),
                (4, atom("O1", "O", Point3::new(0.0, 0.14, 0.0))),
            ];
            let mut model = model_from_parts(entries, &[(1, 2), (1, 3), (1, 4)]);
            model.unite_atoms();

            assert_eq!(model.atom(1).and_then(|a| a.uindex), Some(1));
            assert_eq!(model.atom(4).and_then(|a| a.uindex), Some(2));
        }
    }

    mod derived_bond_attributes {
        use super::*;

        #[test]
        fn measure_bond_lengths_uses_effective_coordinates() {
            let entries = vec![
                (1, atom("C1", "C", Point3::origin())),
                (2, atom("C2", "C", Point3::new(0.15, 0.0, 0.0))),
            ];
            let mut model = model_from_parts(entries, &[(1, 2)]);
            model.measure_bond_lengths();
            let length = model.bonds()[0].length.unwrap();
            assert!((length - 0.15).abs() < 1e-12);
        }

        #[test]
        fn measure_bond_lengths_keeps_source_supplied_values() {
            let entries = vec![
                (1, atom("C1", "C", Point3::origin())),
                (2, atom("C2", "C", Point3::new(0.15, 0.0, 0.0))),
            ];
            let mut model = model_from_parts(entries, &[(1, 2)]);
            model.bonds[0].length = Some(0.1234);
            model.measure_bond_lengths();
            assert_eq!(model.bonds()[0].length, Some(0.1234));
        }

        #[test]
        fn infer_bond_orders_classifies_from_length_and_elements() {
            let entries = vec![
                (1, atom("C1", "C", Point3::origin())),
                (2, atom("C2", "C", Point3::new(0.133, 0.0, 0.0))),
                (3, atom("O1", "O", Point3::new(-0.143, 0.0, 0.0))),
            ];
            let mut model = model_from_parts(entries, &[(1, 2), (1, 3)]);
            model.infer_bond_orders();

            let orders: BTreeMap<(usize, usize), Option<BondOrder>> = model
                .bonds()
                .iter()
                .map(|b| (b.key(), b.order))
                .collect();
            assert_eq!(orders[&(1, 2)], Some(BondOrder::Double));
            assert_eq!(orders[&(1, 3)], Some(BondOrder::Single));
        }
    }

    mod equivalence {
        use super::*;

        #[test]
        fn ungrouped_atoms_each_get_a_unique_class() {
            let entries = vec![
                (1, atom("C1", "C", Point3::origin())),
                (2, atom("C2", "C", Point3::origin())),
                (3, atom("C3", "C", Point3::origin())),
            ];
            let model = model_from_parts(entries, &[(1, 2), (2, 3)]);
            let classes = model.equivalence_classes();
            assert_eq!(classes[&1], 0);
            assert_eq!(classes[&2], 1);
            assert_eq!(classes[&3], 2);
        }

        #[test]
        fn shared_group_tags_collapse_to_one_dense_class() {
            let mut entries = vec![
                (1, atom("C1", "C", Point3::origin())),
                (2, atom("H1", "H", Point3::origin())),
                (3, atom("H2", "H", Point3::origin())),
                (4, atom("H3", "H", Point3::origin())),
            ];
            entries[1].1.equivalence_group = 5;
            entries[2].1.equivalence_group = 5;
            entries[3].1.equivalence_group = 5;
            let model = model_from_parts(entries, &[(1, 2), (1, 3), (1, 4)]);

            let classes = model.equivalence_classes();
            assert_eq!(classes[&1], 0);
            assert_eq!(classes[&2], 1);
            assert_eq!(classes[&3], 1);
            assert_eq!(classes[&4], 1);
        }

        #[test]
        fn classes_are_densely_numbered_in_id_order() {
            let mut entries = vec![
                (1, atom("N1", "N", Point3::origin())),
                (2, atom("C1", "C", Point3::origin())),
                (3, atom("N2", "N", Point3::origin())),
                (4, atom("C2", "C", Point3::origin())),
            ];
            entries[0].1.equivalence_group = 9;
            entries[2].1.equivalence_group = 9;
            entries[1].1.equivalence_group = 4;
            entries[3].1.equivalence_group = 4;
            let model = model_from_parts(entries, &[(1, 2), (2, 3), (3, 4)]);

            let classes = model.equivalence_classes();
            assert_eq!(classes[&1], 0);
            assert_eq!(classes[&2], 1);
            assert_eq!(classes[&3], 0);
            assert_eq!(classes[&4], 1);
        }
    }

    mod rings_view {
        use super::*;

        #[test]
        fn aromatic_atom_ids_union_aromatic_rings_only() {
            let entries = vec![
                (1, atom("C1", "C", Point3::origin())),
                (2, atom("C2", "C", Point3::origin())),
                (3, atom("C3", "C", Point3::origin())),
                (4, atom("C4", "C", Point3::origin())),
            ];
            let mut model = model_from_parts(entries, &[(1, 2), (2, 3), (3, 4), (4, 1)]);
            let mut aromatic = Ring::new(vec![1, 2, 3]);
            aromatic.aromatic = true;
            model.set_rings(vec![aromatic, Ring::new(vec![2, 3, 4])]);

            let ids = model.aromatic_atom_ids();
            assert_eq!(ids, BTreeSet::from([1, 2, 3]));
        }
    }
}
