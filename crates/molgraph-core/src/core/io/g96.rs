use super::traits::ModelWriter;
use crate::core::models::molecule::MolecularModel;
use std::io::{self, Write};

/// Options for the GROMOS96-style structure writer.
#[derive(Debug, Clone)]
pub struct G96Options {
    /// Render the coarse-grained view: united ordinals, merged hydrogens
    /// dropped.
    pub united: bool,
    /// Use optimized coordinates where the model carries them.
    pub optimized: bool,
    /// Override the TITLE block content.
    pub title: Option<String>,
}

impl Default for G96Options {
    fn default() -> Self {
        Self {
            united: false,
            optimized: true,
            title: None,
        }
    }
}

/// The GROMOS96-style structure format: a TITLE block followed by a POSITION
/// block with one fixed-width line per atom, coordinates in nanometers.
pub struct G96File;

impl ModelWriter for G96File {
    type Options = G96Options;
    type Error = io::Error;

    fn write_to(
        model: &MolecularModel,
        options: &Self::Options,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        writeln!(writer, "TITLE")?;
        match &options.title {
            Some(title) => writeln!(writer, "{}", title)?,
            None => writeln!(writer, "{}", model.name())?,
        }
        writeln!(writer, "END")?;

        writeln!(writer, "POSITION")?;
        for (_, atom) in model.atoms() {
            let ordinal = if options.united {
                match atom.uindex {
                    Some(uindex) => uindex,
                    None => continue,
                }
            } else {
                atom.index
            };
            let coord = if options.optimized {
                atom.effective_coord()
            } else {
                atom.coord
            };
            writeln!(
                writer,
                "{:>5} {:>5} {:>5}{:>7}{:>15.9}{:>15.9}{:>15.9}",
                1, atom.group, atom.label, ordinal, coord.x, coord.y, coord.z
            )?;
        }
        writeln!(writer, "END")?;
        Ok(())
    }
}
