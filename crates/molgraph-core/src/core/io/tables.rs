use crate::core::models::molecule::MolecularModel;
use crate::core::models::topology::BondOrder;
use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write as _};
use std::path::Path;
use thiserror::Error;

/// Errors raised while rendering tabular output.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Serialize)]
struct AtomRow<'a> {
    id: usize,
    index: usize,
    uindex: Option<usize>,
    label: &'a str,
    element: &'a str,
    group: &'a str,
    x: f64,
    y: f64,
    z: f64,
    partial_charge: Option<f64>,
    equivalence_class: usize,
}

#[derive(Debug, Serialize)]
struct BondRow {
    atom1: usize,
    atom2: usize,
    length: Option<f64>,
    order: Option<BondOrder>,
    united: Option<bool>,
}

/// Writes the atom table: one row per atom in ascending id order, with
/// effective coordinates and the canonical equivalence class.
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails.
pub fn write_atom_table(
    model: &MolecularModel,
    writer: &mut impl io::Write,
) -> Result<(), TableError> {
    let classes = model.equivalence_classes();
    let mut csv_writer = Writer::from_writer(writer);
    for (id, atom) in model.atoms() {
        let coord = atom.effective_coord();
        csv_writer.serialize(AtomRow {
            id,
            index: atom.index,
            uindex: atom.uindex,
            label: &atom.label,
            element: &atom.element,
            group: &atom.group,
            x: coord.x,
            y: coord.y,
            z: coord.z,
            partial_charge: atom.partial_charge,
            equivalence_class: classes.get(&id).copied().unwrap_or_default(),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the bond table: one row per bond in derivation order.
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails.
pub fn write_bond_table(
    model: &MolecularModel,
    writer: &mut impl io::Write,
) -> Result<(), TableError> {
    let mut csv_writer = Writer::from_writer(writer);
    for bond in model.bonds() {
        csv_writer.serialize(BondRow {
            atom1: bond.atom1_id,
            atom2: bond.atom2_id,
            length: bond.length,
            order: bond.order,
            united: bond.united,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the atom table to a file path.
///
/// # Errors
///
/// Returns an error if the file cannot be created or writing fails.
pub fn write_atom_table_to_path<P: AsRef<Path>>(
    model: &MolecularModel,
    path: P,
) -> Result<(), TableError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_atom_table(model, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes the bond table to a file path.
///
/// # Errors
///
/// Returns an error if the file cannot be created or writing fails.
pub fn write_bond_table_to_path<P: AsRef<Path>>(
    model: &MolecularModel,
    path: P,
) -> Result<(), TableError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_bond_table(model, &mut writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::{BuildOptions, MoleculeSource, build_model};
    use tempfile::tempdir;

    fn ethane_model() -> MolecularModel {
        let text = "\
ATOM      1  C1  ETH     0       0.000   0.000   0.000  1.00  0.00           C
ATOM      2  C2  ETH     0       1.530   0.000   0.000  1.00  0.00           C
ATOM      3  H1  ETH     0      -0.360   1.030   0.000  1.00  0.00           H
ATOM      4  H2  ETH     0      -0.360  -0.520   0.890  1.00  0.00           H
ATOM      5  H3  ETH     0       1.890   1.030   0.000  1.00  0.00           H
ATOM      6  H4  ETH     0       1.890  -0.520   0.890  1.00  0.00           H
CONECT    1    2    3    4
CONECT    2    5    6
";
        build_model(
            MoleculeSource::PdbText(text.to_string()),
            &BuildOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn atom_table_has_header_and_one_row_per_atom() {
        let mut buffer = Vec::new();
        write_atom_table(&ethane_model(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "id,index,uindex,label,element,group,x,y,z,partial_charge,equivalence_class"
        );
        assert_eq!(lines.len(), 7);
        assert!(lines[1].starts_with("1,1,,C1,C,ETH,"));
    }

    #[test]
    fn united_ordinals_show_up_after_the_pass() {
        let mut model = ethane_model();
        model.unite_atoms();
        let mut buffer = Vec::new();
        write_atom_table(&model, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.lines().nth(1).unwrap().starts_with("1,1,1,C1,"));
        // Merged hydrogens keep an empty uindex column.
        assert!(text.lines().nth(3).unwrap().starts_with("3,3,,H1,"));
    }

    #[test]
    fn bond_table_lists_lengths_and_orders_when_derived() {
        let mut model = ethane_model();
        model.measure_bond_lengths();
        model.infer_bond_orders();
        let mut buffer = Vec::new();
        write_bond_table(&model, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "atom1,atom2,length,order,united");
        assert_eq!(lines.len(), 6);
        // C-C at 0.153 nm is a single bond.
        assert!(lines[1].starts_with("1,2,0.153"));
        assert!(lines[1].contains("Single"));
    }

    #[test]
    fn tables_write_to_paths() {
        let model = ethane_model();
        let dir = tempdir().unwrap();
        let atoms_path = dir.path().join("atoms.csv");
        let bonds_path = dir.path().join("bonds.csv");

        write_atom_table_to_path(&model, &atoms_path).unwrap();
        write_bond_table_to_path(&model, &bonds_path).unwrap();

        let atoms = std::fs::read_to_string(&atoms_path).unwrap();
        let bonds = std::fs::read_to_string(&bonds_path).unwrap();
        assert_eq!(atoms.lines().count(), 7);
        assert_eq!(bonds.lines().count(), 6);
    }
}
