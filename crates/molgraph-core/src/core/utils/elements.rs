use phf::phf_map;

/// Connectivity counts under which an element is compatible with an aromatic
/// ring. Elements absent from the table never veto aromaticity.
static ACCEPTED_PLANAR_VALENCES: phf::Map<&'static str, &'static [usize]> = phf_map! {
    "C" => &[3],
    "N" => &[2, 3],
    "O" => &[2],
    "S" => &[2],
};

/// Returns the accepted connectivity counts for `element` in an aromatic
/// ring, or `None` when the element carries no valence constraint.
pub fn accepted_planar_valences(element: &str) -> Option<&'static [usize]> {
    ACCEPTED_PLANAR_VALENCES.get(element).copied()
}

/// Returns the bond-length threshold (in nanometers) below which a bond
/// between the two elements is classified as a double bond. Unordered lookup;
/// element pairs without a calibrated cutoff return `None`.
pub fn double_bond_cutoff(element1: &str, element2: &str) -> Option<f64> {
    let pair = if element1 <= element2 {
        (element1, element2)
    } else {
        (element2, element1)
    };
    match pair {
        ("C", "C") => Some(0.139),
        ("C", "N") => Some(0.132),
        ("C", "O") => Some(0.134),
        ("N", "N") => Some(0.136),
        _ => None,
    }
}
