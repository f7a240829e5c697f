use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// A lattice deck as written on disk.
///
/// Section tables are kept raw; their keys are checked by the core sections so that
/// unknown keys report the section they belong to.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DeckFile {
    #[serde(default)]
    pub lattice: toml::Table,
    #[serde(default)]
    pub reference: toml::Table,
    #[serde(default)]
    pub beam: toml::Table,
    #[serde(default)]
    pub cavities: Vec<toml::Table>,
}

impl DeckFile {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading deck from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn parse_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
