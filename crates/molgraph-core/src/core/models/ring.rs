use std::collections::BTreeSet;

/// Represents a simple cycle detected in the connectivity graph.
///
/// The atom ids are stored in path order as discovered by the ring finder; the
/// cycle is closed by the bond between the first and last atoms. Two rings
/// covering the same atom *set* are never both retained by the finder, so the
/// ordered list is unique per retained ring.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    /// The atom ids along the cycle, in path order.
    pub atom_ids: Vec<usize>,
    /// Whether the ring passed both the planarity and valence tests.
    pub aromatic: bool,
}

impl Ring {
    /// Creates a non-aromatic ring over the given atom sequence; the
    /// aromaticity classifier fills the flag in afterwards.
    pub fn new(atom_ids: Vec<usize>) -> Self {
        Self {
            atom_ids,
            aromatic: false,
        }
    }

    /// Returns the number of atoms in the cycle.
    pub fn len(&self) -> usize {
        self.atom_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atom_ids.is_empty()
    }

    /// Returns `true` if the ring passes through the given atom.
    pub fn contains(&self, atom_id: usize) -> bool {
        self.atom_ids.contains(&atom_id)
    }

    /// Returns the order-independent atom-id set, the identity used for ring
    /// deduplication.
    pub fn atom_set(&self) -> BTreeSet<usize> {
        self.atom_ids.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ring_is_not_aromatic() {
        let ring = Ring::new(vec![1, 2, 3]);
        assert_eq!(ring.atom_ids, vec![1, 2, 3]);
        assert!(!ring.aromatic);
        assert_eq!(ring.len(), 3);
        assert!(!ring.is_empty());
    }

    #[test]
    fn contains_checks_membership() {
        let ring = Ring::new(vec![4, 9, 12]);
        assert!(ring.contains(9));
        assert!(!ring.contains(5));
    }

    #[test]
    fn atom_set_is_order_independent() {
        let a = Ring::new(vec![3, 1, 2]);
        let b = Ring::new(vec![1, 2, 3]);
        assert_eq!(a.atom_set(), b.atom_set());
    }
}
