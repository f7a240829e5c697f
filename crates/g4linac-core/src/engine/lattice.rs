use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use crate::core::elements::beam::BeamSpec;
use crate::core::elements::cavity::Cavity;
use crate::core::elements::reference::Reference;
use crate::core::section::{ConfigError, FieldKind, FieldSpec, FieldValue, Section};
use crate::core::species::{MassLookup, pdg_mass};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

pub const DEFAULT_BEAM_FILENAME: &str = "beam.txt";

/// A complete lattice: simulation-wide parameters plus the raw configuration of the
/// reference particle, the beam, and an ordered list of RF cavities.
///
/// Element configurations are kept as tables and validated when [`build`](Self::build)
/// runs, before anything is written to disk.
#[derive(Debug, Clone)]
pub struct LatticeConfiguration {
    pub lattice_filename: PathBuf,
    pub do_stochastics: i64,
    pub z_spacing: f64, // mm
    pub min_z: f64,     // mm
    pub max_z: f64,     // mm
    pub max_step: f64,  // mm
    pub eps_max: f64,
    pub output_file: String,
    pub cleanup_dir: bool,

    pub reference: toml::Table,
    pub beam: toml::Table,
    pub rf_cavities: Vec<toml::Table>,

    mass_of: MassLookup,
}

impl Section for LatticeConfiguration {
    const SECTION: &'static str = "lattice";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("lattice_filename", FieldKind::Text),
        FieldSpec::new("do_stochastics", FieldKind::Integer),
        FieldSpec::new("z_spacing", FieldKind::Float),
        FieldSpec::new("min_z", FieldKind::Float),
        FieldSpec::new("max_z", FieldKind::Float),
        FieldSpec::new("max_step", FieldKind::Float),
        FieldSpec::new("eps_max", FieldKind::Float),
        FieldSpec::new("output_file", FieldKind::Text),
        FieldSpec::new("cleanup_dir", FieldKind::Flag),
    ];

    fn assign(&mut self, field: &'static str, value: FieldValue) -> Result<(), ConfigError> {
        match (field, value) {
            ("lattice_filename", FieldValue::Text(v)) => self.lattice_filename = PathBuf::from(v),
            ("do_stochastics", FieldValue::Integer(v)) => self.do_stochastics = v,
            ("z_spacing", FieldValue::Float(v)) => self.z_spacing = v,
            ("min_z", FieldValue::Float(v)) => self.min_z = v,
            ("max_z", FieldValue::Float(v)) => self.max_z = v,
            ("max_step", FieldValue::Float(v)) => self.max_step = v,
            ("eps_max", FieldValue::Float(v)) => self.eps_max = v,
            ("output_file", FieldValue::Text(v)) => self.output_file = v,
            ("cleanup_dir", FieldValue::Flag(v)) => self.cleanup_dir = v,
            (field, value) => return Err(Self::undeclared(field, &value)),
        }
        Ok(())
    }
}

/// Typed elements resolved from a [`LatticeConfiguration`].
#[derive(Debug, Clone)]
pub struct ResolvedElements {
    pub reference: Reference,
    pub beam: BeamSpec,
    pub cavities: Vec<Cavity>,
}

/// What a successful [`LatticeConfiguration::build`] left on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildSummary {
    pub lattice_path: PathBuf,
    pub track_file: PathBuf,
    pub particle_count: usize,
    pub cavity_count: usize,
}

impl LatticeConfiguration {
    pub fn new(lattice_filename: impl Into<PathBuf>) -> Self {
        Self {
            lattice_filename: lattice_filename.into(),
            do_stochastics: 1,
            z_spacing: 100.0,
            min_z: 0.0,
            max_z: 10000.0,
            max_step: 100.0,
            eps_max: 0.01,
            output_file: "output_data".to_string(),
            cleanup_dir: true,
            reference: toml::Table::new(),
            beam: toml::Table::new(),
            rf_cavities: Vec::new(),
            mass_of: pdg_mass,
        }
    }

    /// Replaces the species-id to mass lookup used when sampling the beam.
    pub fn with_mass_lookup(mut self, mass_of: MassLookup) -> Self {
        self.mass_of = mass_of;
        self
    }

    /// Directory holding the lattice file, the track file, and every engine output.
    pub fn output_dir(&self) -> Result<&Path, ConfigError> {
        match self.lattice_filename.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => Ok(dir),
            _ => Err(ConfigError::MissingParameter(
                "lattice_filename must include an output directory",
            )),
        }
    }

    /// Path at which the engine writes its z-sampled output.
    pub fn output_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.output_dir()?.join(format!("{}.txt", self.output_file)))
    }

    /// Validates every element configuration without touching the filesystem.
    pub fn resolve(&self) -> Result<ResolvedElements, ConfigError> {
        let out_dir = self.output_dir()?;

        let reference = Reference::from_config(&self.reference)?;

        let mut beam = BeamSpec::with_location(DEFAULT_BEAM_FILENAME, out_dir);
        beam.apply(&self.beam)?;
        beam.species_mass(self.mass_of)?;

        let mut seen = HashSet::new();
        let cavities = self
            .rf_cavities
            .iter()
            .map(|config| {
                let cavity = Cavity::from_config(config)?;
                if !seen.insert(cavity.name.clone()) {
                    return Err(ConfigError::DuplicateName {
                        section: Cavity::SECTION,
                        name: cavity.name,
                    });
                }
                Ok(cavity)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResolvedElements {
            reference,
            beam,
            cavities,
        })
    }

    pub fn build_topmatter(&self) -> String {
        format!(
            "physics default doStochastics={}\n\
             zntuple cooling_monitor zloop={:?}:{:?}:{:?} format=for009 file={} coordinates=c\n\
             param epsMax={:?}\n\
             param maxStep={:?}\n",
            self.do_stochastics,
            self.min_z,
            self.max_z,
            self.z_spacing,
            self.output_file,
            self.eps_max,
            self.max_step
        )
    }

    pub fn build(&self) -> Result<BuildSummary, EngineError> {
        self.build_with_progress(&ProgressReporter::new())
    }

    /// Writes the lattice file: topmatter, reference, beam, then cavities in order.
    ///
    /// Element configurations are validated first; a configuration error leaves the
    /// output directory untouched.
    #[instrument(skip_all, name = "lattice_build", fields(lattice = %self.lattice_filename.display()))]
    pub fn build_with_progress(
        &self,
        reporter: &ProgressReporter,
    ) -> Result<BuildSummary, EngineError> {
        let mut elements = self.resolve()?;
        let out_dir = self.output_dir()?;

        clean_dir(out_dir, self.cleanup_dir)?;

        let total = 3 + elements.cavities.len() as u64;
        reporter.report(Progress::SectionsStart { total });

        let mut writer = BufWriter::new(File::create(&self.lattice_filename)?);

        writer.write_all(self.build_topmatter().as_bytes())?;
        reporter.report(Progress::SectionWritten {
            label: "topmatter".to_string(),
        });

        writer.write_all(elements.reference.build().as_bytes())?;
        reporter.report(Progress::SectionWritten {
            label: "reference".to_string(),
        });

        let beam_text = elements.beam.build(self.mass_of)?;
        writer.write_all(beam_text.as_bytes())?;
        reporter.report(Progress::SectionWritten {
            label: "beam".to_string(),
        });
        debug!(
            "Beam written with {} particle(s).",
            elements.beam.particles().len()
        );
        if elements.beam.particles().is_empty() {
            reporter.report(Progress::Message(
                "beam has no particles; the engine will track the reference only".to_string(),
            ));
        }

        for cavity in &elements.cavities {
            writer.write_all(cavity.build().as_bytes())?;
            reporter.report(Progress::SectionWritten {
                label: format!("cavity {}", cavity.name),
            });
        }
        writer.flush()?;
        reporter.report(Progress::SectionsFinish);

        info!(
            "Lattice written to {:?} ({} cavities).",
            &self.lattice_filename,
            elements.cavities.len()
        );

        Ok(BuildSummary {
            lattice_path: self.lattice_filename.clone(),
            track_file: elements.beam.track_file_path(),
            particle_count: elements.beam.particles().len(),
            cavity_count: elements.cavities.len(),
        })
    }
}

/// Ensures `dir` exists. With `cleanup`, an existing directory is removed first so
/// its contents never mix with a fresh build.
pub fn clean_dir(dir: &Path, cleanup: bool) -> std::io::Result<()> {
    if dir.exists() {
        if !cleanup {
            return Ok(());
        }
        debug!("Removing existing directory {:?}", dir);
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)
}
