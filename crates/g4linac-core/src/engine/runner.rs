use super::error::EngineError;
use super::lattice::LatticeConfiguration;
use crate::core::section::ConfigError;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{info, instrument, warn};

pub const LOG_FILENAME: &str = "log";

/// Result of a successful engine run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionReport {
    pub log_path: PathBuf,
    pub output_path: PathBuf,
}

/// Runs the simulation engine against a built lattice.
///
/// The engine executes inside the lattice's output directory with the lattice file name
/// as its only argument; stdout and stderr both go to `log` in that directory. The
/// calling process's working directory is never changed.
#[derive(Debug, Clone)]
pub struct EngineRunner {
    binary: PathBuf,
}

impl EngineRunner {
    /// Relative paths with a directory component are made absolute here, once; bare
    /// program names are left for `PATH` lookup.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        let binary = binary.into();
        let binary = if binary.is_relative() && binary.components().count() > 1 {
            std::path::absolute(&binary).unwrap_or(binary)
        } else {
            binary
        };
        Self { binary }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    #[instrument(skip_all, name = "engine_run", fields(binary = %self.binary.display()))]
    pub fn execute(&self, lattice: &LatticeConfiguration) -> Result<ExecutionReport, EngineError> {
        let out_dir = lattice.output_dir()?;
        let lattice_name = lattice
            .lattice_filename
            .file_name()
            .ok_or(ConfigError::MissingParameter("lattice_filename"))?;

        let log_path = out_dir.join(LOG_FILENAME);
        let log = File::create(&log_path)?;
        let log_err = log.try_clone()?;

        info!(
            "Running {} {} in {:?}",
            self.binary.display(),
            lattice_name.to_string_lossy(),
            out_dir
        );
        let status = Command::new(&self.binary)
            .arg(lattice_name)
            .current_dir(out_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(log_err))
            .status()
            .map_err(|source| EngineError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;
        info!("   ... completed with return code {:?}", status.code());

        if !status.success() {
            warn!("Engine failed; output kept in {:?}", &log_path);
            return Err(EngineError::Execution {
                code: status.code(),
                log_path,
            });
        }

        Ok(ExecutionReport {
            log_path,
            output_path: lattice.output_path()?,
        })
    }
}
