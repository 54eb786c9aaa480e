use crate::core::models::molecule::MolecularModel;
use crate::core::models::ring::Ring;
use crate::core::utils::elements::accepted_planar_valences;
use crate::core::utils::geometry::{plane_through, signed_distance_from_plane};
use nalgebra::Point3;
use tracing::debug;

/// Maximum out-of-plane deviation (in nanometers) an atom may have for its
/// ring to still count as planar.
const PLANARITY_TOLERANCE: f64 = 0.025;

/// Classifies a ring as aromatic.
///
/// A ring is aromatic when it is large enough (four atoms or more), all of
/// its atoms lie within [`PLANARITY_TOLERANCE`] of the plane spanned by its
/// first three atoms, and every member element with a valence constraint has
/// an accepted connectivity count. The geometry test uses each atom's
/// effective coordinates, so optimized positions are honored when present.
pub fn is_ring_aromatic(model: &MolecularModel, ring: &Ring) -> bool {
    if ring.len() < 4 {
        return false;
    }
    is_ring_planar(model, ring) && has_aromatic_valences(model, ring)
}

fn is_ring_planar(model: &MolecularModel, ring: &Ring) -> bool {
    let coords: Vec<Point3<f64>> = ring
        .atom_ids
        .iter()
        .filter_map(|id| model.atom(*id))
        .map(|atom| atom.effective_coord())
        .collect();
    if coords.len() != ring.len() {
        return false;
    }

    let (normal, offset) = plane_through(&coords[0], &coords[1], &coords[2]);
    let mut max_deviation = 0.0_f64;
    for point in &coords[3..] {
        let deviation = signed_distance_from_plane(&normal, offset, point).abs();
        max_deviation = max_deviation.max(deviation);
        if deviation > PLANARITY_TOLERANCE {
            debug!(max_deviation, "Ring rejected as non-planar.");
            return false;
        }
    }
    debug!(max_deviation, "Ring accepted as planar.");
    true
}

fn has_aromatic_valences(model: &MolecularModel, ring: &Ring) -> bool {
    for &id in &ring.atom_ids {
        let Some(atom) = model.atom(id) else {
            return false;
        };
        if let Some(accepted) = accepted_planar_valences(&atom.element) {
            let connections = atom.connectivity_count();
            if !accepted.contains(&connections) {
                debug!(
                    atom_id = id,
                    element = %atom.element,
                    connections,
                    "Ring rejected by valence check."
                );
                return false;
            }
        }
    }
    true
}
