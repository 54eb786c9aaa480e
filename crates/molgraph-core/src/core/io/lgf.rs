use super::ExportOutcome;
use crate::core::models::molecule::MolecularModel;
use std::io::{self, Write};
use std::path::Path;

/// Options for the graph-exchange (LGF) writer.
#[derive(Debug, Clone)]
pub struct LgfOptions {
    /// Require optimized coordinates on every atom. When `false`, source
    /// coordinates are an acceptable fallback.
    pub require_optimized: bool,
}

impl Default for LgfOptions {
    fn default() -> Self {
        Self {
            require_optimized: true,
        }
    }
}

/// The lemon-graph-format writer: a `@nodes` section with per-atom charge,
/// labels, element, coordinates, and canonical equivalence class, followed by
/// an `@edges` section listing the bonds.
///
/// The format has hard data prerequisites, so writing reports an
/// [`ExportOutcome`] instead of implementing the common writer interface:
/// a model without partial charges on every atom (or, by default, without
/// optimized coordinates) is declined rather than written incompletely.
pub struct LgfFile;

impl LgfFile {
    /// Writes the model, or declines it when required data is missing.
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O failures; missing model data is an
    /// [`ExportOutcome::NotApplicable`] value, not an error.
    pub fn write_to(
        model: &MolecularModel,
        options: &LgfOptions,
        writer: &mut impl Write,
    ) -> Result<ExportOutcome, io::Error> {
        if !model.has_partial_charges() {
            return Ok(ExportOutcome::NotApplicable(
                "partial charges are not available for every atom".to_string(),
            ));
        }
        if options.require_optimized && !model.has_optimized_coords() {
            return Ok(ExportOutcome::NotApplicable(
                "optimized coordinates are not available for every atom".to_string(),
            ));
        }

        let classes = model.equivalence_classes();

        writeln!(writer, "@nodes")?;
        writeln!(
            writer,
            "partial_charge  label   label2  atomType    coordX  coordY  coordZ  initColor"
        )?;
        for (id, atom) in model.atoms() {
            let coord = atom.effective_coord();
            let class = classes.get(&id).copied().unwrap_or_default();
            writeln!(
                writer,
                "{:.3} {} {} {} {:.3} {:.3} {:.3} {}",
                atom.partial_charge.unwrap_or_default(),
                atom.index,
                atom.label,
                atom.element,
                coord.x,
                coord.y,
                coord.z,
                class
            )?;
        }

        writeln!(writer, "@edges")?;
        writeln!(writer, "        label")?;
        for (ordinal, bond) in model.bonds().iter().enumerate() {
            let (Some(atom1), Some(atom2)) =
                (model.atom(bond.atom1_id), model.atom(bond.atom2_id))
            else {
                continue;
            };
            writeln!(writer, "{} {} {}", atom1.index, atom2.index, ordinal)?;
        }

        Ok(ExportOutcome::Written)
    }

    /// Writes the model to a file path. A declined model leaves no file
    /// behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    pub fn write_to_path<P: AsRef<Path>>(
        model: &MolecularModel,
        options: &LgfOptions,
        path: P,
    ) -> Result<ExportOutcome, io::Error> {
        let mut buffer = Vec::new();
        match Self::write_to(model, options, &mut buffer)? {
            ExportOutcome::Written => {
                std::fs::write(path, buffer)?;
                Ok(ExportOutcome::Written)
            }
            declined => Ok(declined),
        }
    }
}
