use crate::core::elements::beam::BeamError;
use crate::core::io::bltrack::TrackFileError;
use crate::core::io::for009::For009Error;
use crate::core::section::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to write track file '{path}': {source}", path = path.display())]
    TrackFile {
        path: PathBuf,
        #[source]
        source: TrackFileError,
    },

    #[error("Engine failed to launch from '{binary}': {source}", binary = binary.display())]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Engine did not execute successfully ({}); see {}", describe_exit(.code), .log_path.display())]
    Execution {
        code: Option<i32>,
        log_path: PathBuf,
    },

    #[error("Failed to read engine output '{path}': {source}", path = path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: For009Error,
    },

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<BeamError> for EngineError {
    fn from(e: BeamError) -> Self {
        match e {
            BeamError::Config(e) => EngineError::Config(e),
            BeamError::TrackFile { path, source } => EngineError::TrackFile { path, source },
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
