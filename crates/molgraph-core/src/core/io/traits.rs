use crate::core::models::molecule::MolecularModel;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Defines the interface for rendering molecular models into file formats.
///
/// This trait provides a common API for model output: implementors handle
/// format-specific serialization, while the provided methods cover the
/// path-oriented and string-oriented conveniences every format shares.
/// Reading is not part of the trait; only the structure-text format is
/// parsed back, through its own module-level function.
pub trait ModelWriter {
    /// The options value controlling format-specific rendering choices.
    type Options: Default;

    /// The error type for write operations.
    type Error: Error + From<io::Error>;

    /// Writes a molecular model to a writer.
    ///
    /// # Arguments
    ///
    /// * `model` - The molecular model to write.
    /// * `options` - Format-specific rendering options.
    /// * `writer` - The writer to output to.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or I/O operations encounter
    /// issues.
    fn write_to(
        model: &MolecularModel,
        options: &Self::Options,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Writes a molecular model to a writer with default options.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or I/O operations encounter
    /// issues.
    fn write_model_to(model: &MolecularModel, writer: &mut impl Write) -> Result<(), Self::Error> {
        Self::write_to(model, &Self::Options::default(), writer)
    }

    /// Writes a molecular model to a file path.
    ///
    /// # Arguments
    ///
    /// * `model` - The molecular model to write.
    /// * `options` - Format-specific rendering options.
    /// * `path` - The path to the file to write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        model: &MolecularModel,
        options: &Self::Options,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path).map_err(Self::Error::from)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(model, options, &mut writer)
    }

    /// Writes a molecular model to a file path with default options.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_model_to_path<P: AsRef<Path>>(
        model: &MolecularModel,
        path: P,
    ) -> Result<(), Self::Error> {
        Self::write_to_path(model, &Self::Options::default(), path)
    }

    /// Renders a molecular model to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails; formats in this crate only
    /// emit UTF-8, so the text conversion itself cannot fail in practice.
    fn render(model: &MolecularModel, options: &Self::Options) -> Result<String, Self::Error> {
        let mut buffer = Vec::new();
        Self::write_to(model, options, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
    }
}
