use super::traits::ModelWriter;
use crate::core::models::molecule::MolecularModel;
use crate::core::models::records::{AtomRecord, ConnectivityRecord, RecordSet};
use nalgebra::Point3;
use std::collections::BTreeMap;
use std::io::{self, Write};
use tracing::debug;

/// Maximum neighbor references consumed from one connectivity record.
/// Higher connectivity is expressed by repeating records; the mirror pass
/// also recovers neighbors a truncated record dropped.
const MAX_CONECT_NEIGHBORS: usize = 4;

/// Scale factor from model coordinates (nanometers) to structure-file
/// coordinates (Ångström).
const NM_TO_ANGSTROM: f64 = 10.0;

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

/// Parses fixed-column structure text into raw molecule records.
///
/// `ATOM`/`HETATM` lines are read at the fixed columns: record tag `[0,6)`,
/// serial `[6,11)`, label `[12,16)`, group `[17,20)`, residue sequence
/// `[22,27)`, coordinates `[30,38)`/`[38,46)`/`[46,54)` in Ångström,
/// occupancy `[54,60)` and temperature factor `[60,66)` (required but not
/// retained), element `[76,78)` uppercased. `CONECT` lines are split on
/// whitespace: the owner serial followed by up to four neighbor serials,
/// stopping early at a zero or unparsable token.
///
/// Parsing never fails: malformed records are skipped, and every other line
/// is ignored. All structural validation happens later in the build.
pub fn parse_records(text: &str) -> RecordSet {
    let mut records = RecordSet::default();
    for (line_number, line) in text.lines().enumerate() {
        let line_number = line_number + 1;
        match slice_and_trim(line, 0, 6) {
            tag @ ("ATOM" | "HETATM") => match parse_atom_line(line, tag == "HETATM") {
                Some(atom) => records.atoms.push(atom),
                None => debug!(line = line_number, "Malformed atom record skipped."),
            },
            "CONECT" => match parse_conect_line(line) {
                Some(connectivity) => records.connectivity.push(connectivity),
                None => debug!(line = line_number, "Malformed connectivity record skipped."),
            },
            _ => {}
        }
    }
    records
}

fn parse_atom_line(line: &str, hetero: bool) -> Option<AtomRecord> {
    let serial: usize = slice_and_trim(line, 6, 11).parse().ok()?;
    let label = slice_and_trim(line, 12, 16);
    let group = slice_and_trim(line, 17, 20);
    let residue_seq: isize = slice_and_trim(line, 22, 27).parse().ok()?;
    let x: f64 = slice_and_trim(line, 30, 38).parse().ok()?;
    let y: f64 = slice_and_trim(line, 38, 46).parse().ok()?;
    let z: f64 = slice_and_trim(line, 46, 54).parse().ok()?;
    let _occupancy: f64 = slice_and_trim(line, 54, 60).parse().ok()?;
    let _temperature_factor: f64 = slice_and_trim(line, 60, 66).parse().ok()?;
    let element = slice_and_trim(line, 76, 78).to_uppercase();

    let mut record = AtomRecord::new(serial, label, group, &element, Point3::new(x, y, z));
    record.hetero = hetero;
    record.residue_seq = residue_seq;
    Some(record)
}

fn parse_conect_line(line: &str) -> Option<ConnectivityRecord> {
    let mut tokens = line.split_whitespace();
    tokens.next()?;
    let serial: usize = tokens.next()?.parse().ok()?;

    let mut neighbors = Vec::new();
    for token in tokens.take(MAX_CONECT_NEIGHBORS) {
        let Ok(neighbor) = token.parse::<usize>() else {
            break;
        };
        if neighbor == 0 {
            break;
        }
        neighbors.push(neighbor);
    }
    Some(ConnectivityRecord::new(serial, neighbors))
}

/// Options for the structure-file writer.
#[derive(Debug, Clone)]
pub struct PdbWriteOptions {
    /// Render the coarse-grained view: united ordinals, with merged
    /// hydrogens and all references to them dropped.
    pub united: bool,
    /// Use optimized coordinates where the model carries them.
    pub optimized: bool,
    /// Override the synthesized TITLE record.
    pub title: Option<String>,
}

impl Default for PdbWriteOptions {
    fn default() -> Self {
        Self {
            united: false,
            optimized: true,
            title: None,
        }
    }
}

/// The fixed-column structure-file format.
///
/// The writer synthesizes records at the same columns the reader consumes,
/// so its output parses back through [`parse_records`].
pub struct PdbFile;

impl ModelWriter for PdbFile {
    type Options = PdbWriteOptions;
    type Error = io::Error;

    fn write_to(
        model: &MolecularModel,
        options: &Self::Options,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        writeln!(writer, "HEADER    UNCLASSIFIED")?;
        let title = match &options.title {
            Some(title) => title.clone(),
            None => format!(
                "{} ATOM STRUCTURE FOR MOLECULE {}",
                if options.united { "UNITED" } else { "ALL" },
                model.name()
            ),
        };
        writeln!(writer, "TITLE     {}", title)?;
        writeln!(writer, "AUTHOR    GENERATED BY MOLGRAPH")?;

        // id -> ordinal used in this rendering; absent means the atom is
        // dropped from the output entirely.
        let mut ordinals: BTreeMap<usize, usize> = BTreeMap::new();
        for (id, atom) in model.atoms() {
            let ordinal = if options.united {
                match atom.uindex {
                    Some(uindex) => uindex,
                    None => continue,
                }
            } else {
                atom.index
            };
            ordinals.insert(id, ordinal);

            let tag = if atom.hetero { "HETATM" } else { "ATOM" };
            let coord = if options.optimized {
                atom.effective_coord()
            } else {
                atom.coord
            };
            let coord = coord * NM_TO_ANGSTROM;
            writeln!(
                writer,
                "{:<6}{:>5} {:<4} {:<4}    0    {:>8.3}{:>8.3}{:>8.3}  1.00  0.00          {:>2}",
                tag, ordinal, atom.label, atom.group, coord.x, coord.y, coord.z, atom.element
            )?;
        }

        for (id, atom) in model.atoms() {
            let Some(&ordinal) = ordinals.get(&id) else {
                continue;
            };
            let neighbors: Vec<usize> = atom
                .conn
                .iter()
                .filter_map(|neighbor| ordinals.get(neighbor).copied())
                .collect();
            if neighbors.is_empty() {
                continue;
            }
            write!(writer, "CONECT{:>5}", ordinal)?;
            for neighbor in neighbors {
                write!(writer, "{:>5}", neighbor)?;
            }
            writeln!(writer)?;
        }

        writeln!(writer, "END")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::{BuildOptions, MoleculeSource, build_model};
    use tempfile::tempdir;

    mod parsing {
        use super::*;

        const SAMPLE: &str = "\
HEADER    UNCLASSIFIED
ATOM      1  C1  UNL     0       0.000   0.000   0.000  1.00  0.00           C
HETATM    2  CL1 UNL     0       1.760   0.000   0.000  1.00  0.00          CL
CONECT    1    2
CONECT    2    1
END
";

        #[test]
        fn atom_records_read_the_fixed_columns() {
            let records = parse_records(SAMPLE);
            assert_eq!(records.atoms.len(), 2);

            let first = &records.atoms[0];
            assert_eq!(first.serial, 1);
            assert_eq!(first.label, "C1");
            assert_eq!(first.group, "UNL");
            assert_eq!(first.element, "C");
            assert!(!first.hetero);

            let second = &records.atoms[1];
            assert!(second.hetero);
            assert_eq!(second.element, "CL");
            assert!((second.coord.x - 1.76).abs() < 1e-12);
        }

        #[test]
        fn element_symbols_are_uppercased() {
            let lower = SAMPLE.replace("          CL", "          Cl");
            let records = parse_records(&lower);
            assert_eq!(records.atoms[1].element, "CL");
        }

        #[test]
        fn connectivity_records_are_kept_separately_per_line() {
            let records = parse_records(SAMPLE);
            assert_eq!(records.connectivity.len(), 2);
            assert_eq!(records.connectivity[0].serial, 1);
            assert_eq!(records.connectivity[0].neighbors, vec![2]);
        }

        #[test]
        fn conect_neighbors_stop_at_zero() {
            let records = parse_records("CONECT    1    2    0    3\n");
            assert_eq!(records.connectivity[0].neighbors, vec![2]);
        }

        #[test]
        fn conect_neighbors_stop_at_unparsable_token() {
            let records = parse_records("CONECT    1    2    x    3\n");
            assert_eq!(records.connectivity[0].neighbors, vec![2]);
        }

        #[test]
        fn conect_consumes_at_most_four_neighbors() {
            let records = parse_records("CONECT    1    2    3    4    5    6\n");
            assert_eq!(records.connectivity[0].neighbors, vec![2, 3, 4, 5]);
        }

        #[test]
        fn conect_without_owner_serial_is_skipped() {
            let records = parse_records("CONECT\nCONECT   xx    2\n");
            assert!(records.connectivity.is_empty());
        }

        #[test]
        fn malformed_atom_lines_are_skipped() {
            let bad_serial = "ATOM     xx  C1  UNL     0       0.000   0.000   0.000  1.00  0.00           C\n";
            let bad_coord = "ATOM      1  C1  UNL     0       x.xxx   0.000   0.000  1.00  0.00           C\n";
            let truncated = "ATOM      1  C1  UNL     0       0.000\n";
            let text = format!("{bad_serial}{bad_coord}{truncated}");
            let records = parse_records(&text);
            assert!(records.atoms.is_empty());
        }

        #[test]
        fn unrelated_lines_are_ignored() {
            let records = parse_records("REMARK hello\nTER\n\nEND\n");
            assert_eq!(records, RecordSet::default());
        }
    }

    mod writing {
        use super::*;

        fn diatomic_model() -> MolecularModel {
            let text = "\
ATOM      1  C1  UNL     0       0.000   0.000   0.000  1.00  0.00           C
ATOM      2  O1  UNL     0       1.430   0.000   0.000  1.00  0.00           O
CONECT    1    2
CONECT    2    1
";
            build_model(
                MoleculeSource::PdbText(text.to_string()),
                &BuildOptions::default(),
            )
            .unwrap()
        }

        #[test]
        fn single_atom_line_matches_the_column_layout() {
            let text = "\
HETATM    1  NA  ION     0       1.500  -0.250  10.000  1.00  0.00          NA
";
            let model = build_model(
                MoleculeSource::PdbText(text.to_string()),
                &BuildOptions::default(),
            )
            .unwrap();
            let rendered = PdbFile::render(&model, &PdbWriteOptions::default()).unwrap();
            let atom_line = rendered
                .lines()
                .find(|line| line.starts_with("HETATM"))
                .unwrap();
            assert_eq!(
                atom_line,
                "HETATM    1 NA   ION     0       1.500  -0.250  10.000  1.00  0.00          NA"
            );
            assert_eq!(atom_line.len(), 78);
        }

        #[test]
        fn header_names_the_molecule() {
            let model = diatomic_model();
            let rendered = PdbFile::render(&model, &PdbWriteOptions::default()).unwrap();
            let mut lines = rendered.lines();
            assert_eq!(lines.next(), Some("HEADER    UNCLASSIFIED"));
            assert_eq!(
                lines.next(),
                Some("TITLE     ALL ATOM STRUCTURE FOR MOLECULE UNL")
            );
            assert!(rendered.ends_with("END\n"));
        }

        #[test]
        fn title_override_is_verbatim() {
            let model = diatomic_model();
            let options = PdbWriteOptions {
                title: Some("CUSTOM".to_string()),
                ..PdbWriteOptions::default()
            };
            let rendered = PdbFile::render(&model, &options).unwrap();
            assert!(rendered.contains("TITLE     CUSTOM\n"));
        }

        #[test]
        fn output_parses_back_to_the_same_graph() {
            let model = diatomic_model();
            let rendered = PdbFile::render(&model, &PdbWriteOptions::default()).unwrap();
            let reparsed = build_model(
                MoleculeSource::PdbText(rendered),
                &BuildOptions::default(),
            )
            .unwrap();

            assert_eq!(reparsed.atom_count(), model.atom_count());
            assert_eq!(reparsed.bond_count(), model.bond_count());
            for (id, atom) in model.atoms() {
                let other = reparsed.atom(id).unwrap();
                assert_eq!(other.label, atom.label);
                assert_eq!(other.element, atom.element);
                assert!((other.coord - atom.coord).norm() < 1e-9);
            }
        }

        #[test]
        fn source_coordinates_can_be_forced() {
            let text = "\
ATOM      1  C1  UNL     0       1.000   0.000   0.000  1.00  0.00           C
";
            let mut records = parse_records(text);
            records.atoms[0].optimized_coord = Some(Point3::new(2.0, 0.0, 0.0));
            let model = build_model(
                MoleculeSource::Records(records),
                &BuildOptions::default(),
            )
            .unwrap();

            let optimized = PdbFile::render(&model, &PdbWriteOptions::default()).unwrap();
            assert!(optimized.contains("   2.000"));

            let source = PdbFile::render(
                &model,
                &PdbWriteOptions {
                    optimized: false,
                    ..PdbWriteOptions::default()
                },
            )
            .unwrap();
            assert!(source.contains("   1.000"));
        }

        #[test]
        fn united_output_renumbers_and_drops_merged_hydrogens() {
            let text = "\
ATOM      1  C1  UNL     0       0.000   0.000   0.000  1.00  0.00           C
ATOM      2  H1  UNL     0       0.630   0.630   0.630  1.00  0.00           H
ATOM      3  H2  UNL     0      -0.630  -0.630   0.630  1.00  0.00           H
ATOM      4  O1  UNL     0      -0.630   0.630  -0.630  1.00  0.00           O
CONECT    1    2    3    4
";
            let mut model = build_model(
                MoleculeSource::PdbText(text.to_string()),
                &BuildOptions::default(),
            )
            .unwrap();
            model.unite_atoms();

            let rendered = PdbFile::render(
                &model,
                &PdbWriteOptions {
                    united: true,
                    ..PdbWriteOptions::default()
                },
            )
            .unwrap();

            let atom_lines: Vec<&str> = rendered
                .lines()
                .filter(|line| line.starts_with("ATOM"))
                .collect();
            assert_eq!(atom_lines.len(), 2);
            assert!(atom_lines[0].contains(" C1 "));
            assert!(atom_lines[1].contains(" O1 "));
            // The oxygen is renumbered from 4 to 2.
            assert_eq!(slice_and_trim(atom_lines[1], 6, 11), "2");

            let conect_lines: Vec<&str> = rendered
                .lines()
                .filter(|line| line.starts_with("CONECT"))
                .collect();
            assert_eq!(conect_lines, vec!["CONECT    1    2", "CONECT    2    1"]);
        }

        #[test]
        fn write_to_path_creates_the_file() {
            let model = diatomic_model();
            let dir = tempdir().unwrap();
            let path = dir.path().join("molecule.pdb");
            PdbFile::write_model_to_path(&model, &path).unwrap();

            let written = std::fs::read_to_string(&path).unwrap();
            assert!(written.starts_with("HEADER"));
            assert!(written.ends_with("END\n"));
        }
    }
}
