use crate::core::models::molecule::MolecularModel;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

/// Integer-keyed adjacency view over a model's connectivity table.
///
/// The structure is immutable; all per-search state lives in a separate
/// [`EdgeWeights`] overlay so concurrent searches never interfere.
pub(crate) struct SearchGraph {
    neighbors: BTreeMap<usize, Vec<usize>>,
}

impl SearchGraph {
    pub(crate) fn from_model(model: &MolecularModel) -> Self {
        let neighbors = model
            .atoms()
            .map(|(id, atom)| (id, atom.conn.clone()))
            .collect();
        Self { neighbors }
    }

    pub(crate) fn neighbors(&self, atom_id: usize) -> &[usize] {
        self.neighbors
            .get(&atom_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Sparse undirected edge-weight overlay. Every edge weighs 1 until a search
/// raises it; keys are canonicalized so both traversal directions share one
/// weight.
pub(crate) struct EdgeWeights {
    weights: HashMap<(usize, usize), u32>,
}

impl EdgeWeights {
    pub(crate) fn new() -> Self {
        Self {
            weights: HashMap::new(),
        }
    }

    fn canonical(a: usize, b: usize) -> (usize, usize) {
        (a.min(b), a.max(b))
    }

    pub(crate) fn get(&self, a: usize, b: usize) -> u32 {
        *self.weights.get(&Self::canonical(a, b)).unwrap_or(&1)
    }

    pub(crate) fn set(&mut self, a: usize, b: usize, weight: u32) {
        self.weights.insert(Self::canonical(a, b), weight);
    }
}

/// Dijkstra shortest path from `start` to `goal` under the given weight
/// overlay. Returns the node sequence including both endpoints, or `None`
/// when `goal` is unreachable.
///
/// Ties in the priority queue resolve by ascending node id, and neighbor
/// lists are iterated in sorted order, so the returned path is deterministic
/// for a given graph and overlay.
pub(crate) fn shortest_path(
    graph: &SearchGraph,
    weights: &EdgeWeights,
    start: usize,
    goal: usize,
) -> Option<Vec<usize>> {
    let mut dist: HashMap<usize, u32> = HashMap::new();
    let mut prev: HashMap<usize, usize> = HashMap::new();
    let mut heap: BinaryHeap<Reverse<(u32, usize)>> = BinaryHeap::new();

    dist.insert(start, 0);
    heap.push(Reverse((0, start)));

    while let Some(Reverse((d, node))) = heap.pop() {
        if d > *dist.get(&node).unwrap_or(&u32::MAX) {
            continue;
        }
        if node == goal {
            break;
        }
        for &next in graph.neighbors(node) {
            let candidate = d + weights.get(node, next);
            if dist.get(&next).is_none_or(|&current| candidate < current) {
                dist.insert(next, candidate);
                prev.insert(next, node);
                heap.push(Reverse((candidate, next)));
            }
        }
    }

    if !dist.contains_key(&goal) {
        return None;
    }

    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        current = *prev.get(&current)?;
        path.push(current);
    }
    path.reverse();
    Some(path)
}
