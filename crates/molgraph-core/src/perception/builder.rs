use super::error::ModelBuildError;
use super::rings::find_rings;
use super::source::MoleculeSource;
use crate::core::models::atom::{Atom, NO_EQUIVALENCE_GROUP};
use crate::core::models::molecule::MolecularModel;
use crate::core::models::records::{AtomRecord, RecordSet};
use crate::core::models::topology::Bond;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument, warn};

/// Scale factor from source coordinates (Ångström) to model coordinates
/// (nanometers).
const ANGSTROM_TO_NM: f64 = 0.1;

/// Controls for the model building pipeline.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Treat atoms without any connectivity in a multi-atom molecule as a
    /// fatal input defect. A single-atom molecule is always exempt.
    pub enforce_single_molecule: bool,
    /// Run ring perception (and aromaticity classification) once the graph
    /// is validated.
    pub detect_rings: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            enforce_single_molecule: true,
            detect_rings: true,
        }
    }
}

/// Builds validated molecular models from raw molecule records.
///
/// The builder owns the normalization rules: coordinate scaling, connectivity
/// symmetrization, reference validation, and bond derivation. It never
/// returns a partially built model; any defect aborts the whole build.
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    options: BuildOptions,
}

impl ModelBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Builds a molecular model from raw records.
    ///
    /// Atom records are ingested in order with last-wins semantics for
    /// duplicate serials. Connectivity is merged onto known atoms (entries
    /// owned by unknown serials are ignored), self references are dropped,
    /// and every reference is mirrored so the final lists are symmetric,
    /// sorted, and deduplicated. Bonds are then derived from the normalized
    /// lists, one per unordered neighbor pair, and any source-supplied bond
    /// attributes are applied to the matching derived bonds.
    ///
    /// # Errors
    ///
    /// Returns [`ModelBuildError::DanglingConnectivity`] when a known atom
    /// references a serial no atom record declared, and
    /// [`ModelBuildError::MissingConnectivity`] when a multi-atom molecule
    /// contains unconnected atoms and the builder is configured to enforce a
    /// single connected molecule.
    pub fn build(&self, records: RecordSet) -> Result<MolecularModel, ModelBuildError> {
        let name = records
            .name
            .clone()
            .or_else(|| records.atoms.first().map(|a| a.group.clone()))
            .unwrap_or_default();

        let mut atoms: BTreeMap<usize, Atom> = BTreeMap::new();
        for record in &records.atoms {
            if atoms.contains_key(&record.serial) {
                debug!(serial = record.serial, "Duplicate atom serial; keeping the later record.");
            }
            atoms.insert(record.serial, atom_from_record(record));
        }

        for record in &records.connectivity {
            let Some(atom) = atoms.get_mut(&record.serial) else {
                debug!(
                    serial = record.serial,
                    "Connectivity record owned by an unknown atom; ignored."
                );
                continue;
            };
            atom.conn.extend(record.neighbors.iter().copied());
        }

        self.normalize_connectivity(&mut atoms)?;
        self.check_connectivity_presence(&atoms)?;

        let mut bonds = derive_bonds(&atoms);
        apply_bond_extras(&mut bonds, &records);

        Ok(MolecularModel::new(
            name,
            records.net_charge,
            atoms,
            bonds,
        ))
    }

    /// Symmetrizes connectivity lists and validates every reference.
    ///
    /// Self references are dropped. References to unknown serials are
    /// collected, logged, and turned into a fatal error that names every
    /// offending `(owner, unknown)` pair.
    fn normalize_connectivity(
        &self,
        atoms: &mut BTreeMap<usize, Atom>,
    ) -> Result<(), ModelBuildError> {
        let known: BTreeSet<usize> = atoms.keys().copied().collect();

        let mut dangling: Vec<(usize, usize)> = Vec::new();
        let mut mirrored: Vec<(usize, usize)> = Vec::new();
        for (&id, atom) in atoms.iter() {
            for &neighbor in &atom.conn {
                if neighbor == id {
                    continue;
                }
                if known.contains(&neighbor) {
                    mirrored.push((neighbor, id));
                } else {
                    dangling.push((id, neighbor));
                }
            }
        }

        if !dangling.is_empty() {
            for &(owner, unknown) in &dangling {
                warn!(
                    atom_id = owner,
                    reference = unknown,
                    "Connectivity references an unknown atom; reference removed."
                );
            }
            dangling.sort_unstable();
            dangling.dedup();
            return Err(ModelBuildError::DanglingConnectivity {
                references: dangling,
            });
        }

        for (owner, back_reference) in mirrored {
            if let Some(atom) = atoms.get_mut(&owner) {
                atom.conn.push(back_reference);
            }
        }
        for (&id, atom) in atoms.iter_mut() {
            atom.conn.retain(|&neighbor| neighbor != id);
            atom.conn.sort_unstable();
            atom.conn.dedup();
        }
        Ok(())
    }

    fn check_connectivity_presence(
        &self,
        atoms: &BTreeMap<usize, Atom>,
    ) -> Result<(), ModelBuildError> {
        if atoms.len() <= 1 {
            return Ok(());
        }
        let unconnected: Vec<usize> = atoms
            .iter()
            .filter(|(_, atom)| atom.conn.is_empty())
            .map(|(&id, _)| id)
            .collect();
        if unconnected.is_empty() {
            return Ok(());
        }
        if self.options.enforce_single_molecule {
            return Err(ModelBuildError::MissingConnectivity {
                atom_ids: unconnected,
            });
        }
        for &id in &unconnected {
            warn!(atom_id = id, "Atom carries no connectivity.");
        }
        Ok(())
    }
}

fn atom_from_record(record: &AtomRecord) -> Atom {
    let mut atom = Atom::new(&record.label, &record.group, record.coord * ANGSTROM_TO_NM);
    atom.element = record.element.clone();
    atom.hetero = record.hetero;
    atom.index = record.serial;
    atom.optimized_coord = record.optimized_coord.map(|coord| coord * ANGSTROM_TO_NM);
    atom.partial_charge = record.partial_charge;
    atom.equivalence_group = record.equivalence_group.unwrap_or(NO_EQUIVALENCE_GROUP);
    atom
}

/// Derives one bond per unordered neighbor pair, in ascending id order.
fn derive_bonds(atoms: &BTreeMap<usize, Atom>) -> Vec<Bond> {
    let mut bonds = Vec::new();
    for (&id, atom) in atoms {
        for &neighbor in &atom.conn {
            if id < neighbor {
                bonds.push(Bond::new(id, neighbor));
            }
        }
    }
    bonds
}

fn apply_bond_extras(bonds: &mut [Bond], records: &RecordSet) {
    for extra in &records.bond_extras {
        let key = (extra.atom1.min(extra.atom2), extra.atom1.max(extra.atom2));
        match bonds.iter_mut().find(|bond| bond.key() == key) {
            Some(bond) => {
                if extra.length.is_some() {
                    bond.length = extra.length;
                }
                if extra.order.is_some() {
                    bond.order = extra.order;
                }
            }
            None => debug!(
                atom1 = extra.atom1,
                atom2 = extra.atom2,
                "Bond attributes match no derived bond; ignored."
            ),
        }
    }
}

/// Builds a complete molecular model from any supported source.
///
/// The source is adapted into raw records, validated and normalized into a
/// bonded graph, and (unless disabled) swept for rings with aromaticity
/// classified as each ring is retained.
///
/// # Errors
///
/// Propagates [`ModelBuildError`] from the graph building stage; ring
/// perception itself cannot fail.
#[instrument(skip_all, name = "build_model")]
pub fn build_model(
    source: MoleculeSource,
    options: &BuildOptions,
) -> Result<MolecularModel, ModelBuildError> {
    let records = source.into_records();
    info!(
        atoms = records.atoms.len(),
        connectivity = records.connectivity.len(),
        "Ingesting molecule records."
    );

    let builder = ModelBuilder::new(options.clone());
    let mut model = builder.build(records)?;

    if options.detect_rings {
        let rings = find_rings(&model);
        info!(rings = rings.len(), "Ring perception complete.");
        model.set_rings(rings);
    }

    info!(
        atoms = model.atom_count(),
        bonds = model.bond_count(),
        rings = model.ring_count(),
        "Molecular model built."
    );
    Ok(model)
}
