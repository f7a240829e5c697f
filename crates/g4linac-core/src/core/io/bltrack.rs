use super::traits::TrackFile;
use crate::core::particle::Particle;
use std::io::{self, Write};
use thiserror::Error;

const HEADER: &str = "#BLTrackFile generated by g4linac";
const COLUMNS: &str = "#x y z Px Py Pz t PDGid EventID TrackID ParentID Weight";
const UNITS: &str = "#mm mm mm MeV/c MeV/c MeV/c ns - - - - -";

#[derive(Debug, Error)]
pub enum TrackFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Particle with event number {event_number} has non-finite {quantity}")]
    NonFinite {
        event_number: u64,
        quantity: &'static str,
    },
}

/// ASCII track file read by the engine's `beam ascii ... format=BLTrackFile` command.
///
/// Every particle is written on axis at the origin; the deck's `beamZ=` places the beam.
pub struct BlTrackFile;

impl TrackFile for BlTrackFile {
    type Error = TrackFileError;

    fn write_to(particles: &[Particle], writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "{HEADER}")?;
        writeln!(writer, "{COLUMNS}")?;
        writeln!(writer, "{UNITS}")?;

        for particle in particles {
            let pz = particle.pz();
            for (quantity, value) in [("time", particle.t), ("momentum", pz)] {
                if !value.is_finite() {
                    return Err(TrackFileError::NonFinite {
                        event_number: particle.event_number,
                        quantity,
                    });
                }
            }
            writeln!(
                writer,
                "{:.6} {:.6} {:.6} {:.6} {:.6} {:.9} {:.9} {} {} {} {} {:.6}",
                0.0,
                0.0,
                0.0,
                0.0,
                0.0,
                pz,
                particle.t,
                particle.pid,
                particle.event_number,
                1,
                0,
                1.0
            )?;
        }
        Ok(())
    }
}
