use super::aromaticity::is_ring_aromatic;
use super::search::{EdgeWeights, SearchGraph, shortest_path};
use crate::core::models::molecule::MolecularModel;
use crate::core::models::ring::Ring;
use itertools::Itertools;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, instrument};

/// Weight placed on a bond's own edge so the search is forced around it.
const DIRECT_EDGE_WEIGHT: u32 = 999;
/// Weight placed on edges of an already-found path so the next search
/// prefers unused edges.
const USED_EDGE_WEIGHT: u32 = 2;

/// Enumerates the rings of the model, one search sweep per bond.
///
/// For each bond the direct edge is penalized and shortest paths between its
/// endpoints are collected until a path repeats, raising the weight of every
/// traversed edge after each find so alternative closures surface. Any path
/// of three or more atoms closes a ring through the bond. Rings are deduped
/// globally by atom set, keep their first-discovered atom order, and are
/// classified for aromaticity as they are retained.
///
/// The result is a deterministic superset of a minimal cycle basis: fused
/// systems can contribute envelope rings in addition to the small rings.
#[instrument(skip_all, name = "find_rings")]
pub fn find_rings(model: &MolecularModel) -> Vec<Ring> {
    let graph = SearchGraph::from_model(model);
    let mut rings: Vec<Ring> = Vec::new();
    let mut seen: HashSet<BTreeSet<usize>> = HashSet::new();

    for bond in model.bonds() {
        let (start, goal) = (bond.atom1_id, bond.atom2_id);
        let mut weights = EdgeWeights::new();
        weights.set(start, goal, DIRECT_EDGE_WEIGHT);

        let mut found_paths: HashSet<Vec<usize>> = HashSet::new();
        loop {
            let Some(path) = shortest_path(&graph, &weights, start, goal) else {
                break;
            };
            if !found_paths.insert(path.clone()) {
                break;
            }
            for (&a, &b) in path.iter().tuple_windows() {
                weights.set(a, b, USED_EDGE_WEIGHT);
            }
            // A two-node path is the bond itself, not a closure around it.
            if path.len() <= 2 {
                continue;
            }
            let atom_set: BTreeSet<usize> = path.iter().copied().collect();
            if seen.insert(atom_set) {
                let mut ring = Ring::new(path);
                ring.aromatic = is_ring_aromatic(model, &ring);
                debug!(
                    atoms = ring.len(),
                    aromatic = ring.aromatic,
                    "Retained ring."
                );
                rings.push(ring);
            }
        }
    }

    rings
}
