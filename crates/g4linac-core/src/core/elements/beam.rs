use crate::core::io::bltrack::{BlTrackFile, TrackFileError};
use crate::core::io::traits::TrackFile;
use crate::core::particle::Particle;
use crate::core::section::{ConfigError, FieldKind, FieldSpec, FieldValue, Section};
use crate::core::species::MassLookup;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum BeamError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to write track file '{path}': {source}", path = path.display())]
    TrackFile {
        path: PathBuf,
        #[source]
        source: TrackFileError,
    },
}

/// A grid over arrival time and kinetic energy, every other coordinate on axis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LongitudinalGrid {
    pub t_min: f64, // ns
    pub t_max: f64, // ns
    pub n_t_steps: usize,
    pub e_min: f64, // kinetic, MeV
    pub e_max: f64, // kinetic, MeV
    pub n_e_steps: usize,
}

impl LongitudinalGrid {
    /// Appends one particle per (t, e) grid point; time is the outer loop.
    pub fn sample(&self, pid: i32, mass: f64, particles: &mut Vec<Particle>) {
        let times = linspace(self.t_min, self.t_max, self.n_t_steps);
        let energies = linspace(self.e_min, self.e_max, self.n_e_steps);
        for &t in &times {
            for &kinetic in &energies {
                let event_number = particles.len() as u64 + 1;
                particles.push(Particle {
                    pid,
                    mass,
                    energy: kinetic + mass,
                    t,
                    event_number,
                });
            }
        }
    }
}

/// One sampling strategy contributing particles to the beam.
#[derive(Debug, Clone, PartialEq)]
pub enum BeamBlock {
    LongitudinalGrid(LongitudinalGrid),
}

impl BeamBlock {
    /// Parses a `{ type = "...", ... }` table, dispatching on the `type` tag.
    pub fn from_value(index: usize, value: &toml::Value) -> Result<Self, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidBeamBlock { index, message };

        let mut table = value
            .as_table()
            .cloned()
            .ok_or_else(|| invalid(format!("expected a table, found {}", value.type_str())))?;
        let block_type = match table.remove("type") {
            Some(toml::Value::String(s)) => s,
            Some(other) => return Err(invalid(format!("`type` must be a string, found {}", other.type_str()))),
            None => return Err(invalid("missing `type` tag".to_string())),
        };

        match block_type.as_str() {
            "longitudinal_grid" => toml::Value::Table(table)
                .try_into::<LongitudinalGrid>()
                .map(BeamBlock::LongitudinalGrid)
                .map_err(|e| invalid(e.to_string())),
            _ => Err(ConfigError::UnknownBeamType(block_type)),
        }
    }

    pub fn sample(&self, pid: i32, mass: f64, particles: &mut Vec<Particle>) {
        match self {
            BeamBlock::LongitudinalGrid(grid) => grid.sample(pid, mass, particles),
        }
    }
}

/// Evenly spaced samples over `[start, stop]`; a single sample sits at the midpoint.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![(start + stop) / 2.0],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut values: Vec<f64> = (0..num).map(|i| start + step * i as f64).collect();
            values[num - 1] = stop;
            values
        }
    }
}

/// The initial particle distribution and the `beam` command that loads it.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamSpec {
    pub filename: String,
    pub out_dir: PathBuf,
    pub pid: i64,
    pub beam_z: f64, // mm
    pub beams: Vec<BeamBlock>,
    particles: Vec<Particle>,
}

impl Default for BeamSpec {
    fn default() -> Self {
        Self {
            filename: String::new(),
            out_dir: PathBuf::new(),
            pid: -13,
            beam_z: 0.0,
            beams: Vec::new(),
            particles: Vec::new(),
        }
    }
}

impl Section for BeamSpec {
    const SECTION: &'static str = "beam";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("filename", FieldKind::Text),
        FieldSpec::new("out_dir", FieldKind::Text),
        FieldSpec::new("pid", FieldKind::Integer),
        FieldSpec::new("beam_z", FieldKind::Float),
        FieldSpec::new("beams", FieldKind::List),
    ];

    fn assign(&mut self, field: &'static str, value: FieldValue) -> Result<(), ConfigError> {
        match (field, value) {
            ("filename", FieldValue::Text(v)) => self.filename = v,
            ("out_dir", FieldValue::Text(v)) => self.out_dir = PathBuf::from(v),
            ("pid", FieldValue::Integer(v)) => self.pid = v,
            ("beam_z", FieldValue::Float(v)) => self.beam_z = v,
            ("beams", FieldValue::List(items)) => {
                self.beams = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| BeamBlock::from_value(index, item))
                    .collect::<Result<_, _>>()?;
            }
            (field, value) => return Err(Self::undeclared(field, &value)),
        }
        Ok(())
    }
}

impl BeamSpec {
    /// A beam whose track file defaults to `out_dir/filename`.
    pub fn with_location(filename: impl Into<String>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            out_dir: out_dir.into(),
            ..Self::default()
        }
    }

    pub fn from_config(config: &toml::Table) -> Result<Self, ConfigError> {
        let mut beam = Self::default();
        beam.apply(config)?;
        Ok(beam)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn track_file_path(&self) -> PathBuf {
        self.out_dir.join(&self.filename)
    }

    fn species(&self) -> Result<i32, ConfigError> {
        i32::try_from(self.pid).map_err(|_| ConfigError::InvalidValue {
            section: Self::SECTION,
            key: "pid".to_string(),
            expected: FieldKind::Integer,
            found: self.pid.to_string(),
        })
    }

    /// Species id and rest mass of the beam particles; also checks the beam can be written.
    pub fn species_mass(&self, mass_of: MassLookup) -> Result<(i32, f64), ConfigError> {
        if self.filename.is_empty() {
            return Err(ConfigError::MissingParameter("beam.filename"));
        }
        let pid = self.species()?;
        let mass = mass_of(pid).ok_or(ConfigError::UnknownSpecies(pid))?;
        Ok((pid, mass))
    }

    /// Regenerates the particles from `beams` and writes them as a track file.
    pub fn build_particle_file(&mut self, mass_of: MassLookup) -> Result<(), BeamError> {
        let (pid, mass) = self.species_mass(mass_of)?;

        self.particles.clear();
        for block in &self.beams {
            block.sample(pid, mass, &mut self.particles);
        }
        if self.particles.is_empty() {
            warn!("Beam '{}' contains no particles.", self.filename);
        }

        let path = self.track_file_path();
        debug!("Writing {} particle(s) to {:?}", self.particles.len(), &path);
        BlTrackFile::write_to_path(&self.particles, &path)
            .map_err(|source| BeamError::TrackFile { path, source })
    }

    /// Writes the track file, then emits the `beam` command referencing it.
    pub fn build(&mut self, mass_of: MassLookup) -> Result<String, BeamError> {
        self.build_particle_file(mass_of)?;
        Ok(format!(
            "\nbeam ascii particle={} nEvents={} filename={} format=BLTrackFile beamZ={:?}\n",
            self.pid,
            self.particles.len(),
            self.filename,
            self.beam_z
        ))
    }
}
