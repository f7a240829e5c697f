use crate::core::particle::Particle;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Defines the interface for writing an initial particle ensemble in an engine's
/// native track-file format.
pub trait TrackFile {
    /// The error type for write operations.
    type Error: Error + From<io::Error>;

    /// Writes the particles, in order, to a writer.
    ///
    /// # Arguments
    ///
    /// * `particles` - The ensemble to write; event numbers are taken as given.
    /// * `writer` - The writer to output to.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(particles: &[Particle], writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Writes the particles to a file path, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(particles: &[Particle], path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(particles, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
