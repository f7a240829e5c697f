use super::defaults::{DefaultsConfig, ENGINE_ENV_VAR};
use super::file::DeckFile;
use super::models::AppConfig;
use crate::cli::DeckArgs;
use crate::error::{CliError, Result};
use crate::utils::parser::{self, DeckSection};
use g4linac::core::section::Section;
use g4linac::engine::lattice::LatticeConfiguration;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Layers built-in defaults, the deck file, `--set` overrides, and explicit flags, in
/// that order.
pub fn build_config(args: &DeckArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let deck = DeckFile::from_file(&args.deck)?;
    let deck = apply_set_values(deck, &args.set_values)?;

    let lattice = lattice_from_deck(deck, &defaults, args.lattice_file.as_deref())?;
    debug!(
        "Lattice configured: file={:?}, z={}..{} step {}, {} cavit(ies)",
        &lattice.lattice_filename,
        lattice.min_z,
        lattice.max_z,
        lattice.z_spacing,
        lattice.rf_cavities.len()
    );

    Ok(AppConfig {
        deck_path: args.deck.clone(),
        lattice,
    })
}

fn lattice_from_deck(
    deck: DeckFile,
    defaults: &DefaultsConfig,
    lattice_file: Option<&Path>,
) -> Result<LatticeConfiguration> {
    let mut lattice = LatticeConfiguration::new(&defaults.lattice_filename);
    lattice.apply(&deck.lattice)?;
    if let Some(path) = lattice_file {
        lattice.lattice_filename = path.to_path_buf();
    }
    lattice.reference = deck.reference;
    lattice.beam = deck.beam;
    lattice.rf_cavities = deck.cavities;
    Ok(lattice)
}

fn apply_set_values(mut deck: DeckFile, set_values: &[String]) -> Result<DeckFile> {
    for pair in set_values {
        let set = parser::parse_set_value(pair).map_err(|e| CliError::Argument(e.to_string()))?;
        let table = match set.section {
            DeckSection::Lattice => &mut deck.lattice,
            DeckSection::Reference => &mut deck.reference,
            DeckSection::Beam => &mut deck.beam,
            DeckSection::Cavity(index) => {
                let count = deck.cavities.len();
                deck.cavities.get_mut(index).ok_or_else(|| {
                    CliError::Config(format!(
                        "Cannot set '{}': the deck defines {} cavit(ies), index {} is out of range.",
                        pair, count, index
                    ))
                })?
            }
        };
        debug!("Overriding {} from --set", pair);
        table.insert(set.key, set.value);
    }
    Ok(deck)
}

/// Engine binary from the command line (or `G4BL_PATH`, which clap folds in), falling
/// back to the default install location.
pub fn resolve_engine_path(cli_arg: Option<&Path>, defaults: &DefaultsConfig) -> PathBuf {
    match cli_arg {
        Some(path) => path.to_path_buf(),
        None => {
            debug!(
                "Neither --engine nor {} is set; using {:?}",
                ENGINE_ENV_VAR, &defaults.engine_path
            );
            defaults.engine_path.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use g4linac::core::section::ConfigError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DECK: &str = r#"
        [lattice]
        max_z = 2000.0
        do_stochastics = 0

        [reference]
        p_start = 205.0356

        [[cavities]]
        name = "rf0"
        z_position = 1000.0
    "#;

    fn deck_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn args(deck: &Path, set_values: &[&str]) -> DeckArgs {
        DeckArgs {
            deck: deck.to_path_buf(),
            lattice_file: None,
            set_values: set_values.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn deck_values_override_defaults() {
        let file = deck_file(DECK);
        let config = build_config(&args(file.path(), &[])).unwrap();

        assert_eq!(config.lattice.max_z, 2000.0);
        assert_eq!(config.lattice.do_stochastics, 0);
        assert_eq!(config.lattice.z_spacing, 100.0);
        assert_eq!(
            config.lattice.lattice_filename,
            PathBuf::from("output/linac.g4bl")
        );
        assert_eq!(config.lattice.rf_cavities.len(), 1);
        assert_eq!(config.deck_path, file.path());
    }

    #[test]
    fn set_values_override_the_deck() {
        let file = deck_file(DECK);
        let config = build_config(&args(
            file.path(),
            &["lattice.max_z=3000", "reference.p_start=210.0", "cavities.0.phase=30.0"],
        ))
        .unwrap();

        assert_eq!(config.lattice.max_z, 3000.0);
        assert_eq!(
            config.lattice.reference["p_start"],
            toml::Value::Float(210.0)
        );
        assert_eq!(
            config.lattice.rf_cavities[0]["phase"],
            toml::Value::Float(30.0)
        );
    }

    #[test]
    fn lattice_file_flag_wins_over_deck_and_set() {
        let file = deck_file(DECK);
        let mut deck_args = args(file.path(), &["lattice.lattice_filename=a/b.g4bl"]);
        deck_args.lattice_file = Some(PathBuf::from("run/deck.g4bl"));

        let config = build_config(&deck_args).unwrap();
        assert_eq!(
            config.lattice.lattice_filename,
            PathBuf::from("run/deck.g4bl")
        );
    }

    #[test]
    fn unknown_lattice_key_is_a_section_error() {
        let file = deck_file("[lattice]\nmax_zz = 1.0\n");
        let err = build_config(&args(file.path(), &[])).err().unwrap();
        assert!(matches!(
            err,
            CliError::Section(ConfigError::UnrecognizedField { section: "lattice", .. })
        ));
    }

    #[test]
    fn cavity_index_out_of_range_is_rejected() {
        let file = deck_file(DECK);
        let err = build_config(&args(file.path(), &["cavities.3.phase=1"]))
            .err()
            .unwrap();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn malformed_set_value_is_an_argument_error() {
        let file = deck_file(DECK);
        let err = build_config(&args(file.path(), &["max_z"])).err().unwrap();
        assert!(matches!(err, CliError::Argument(_)));
    }

    #[test]
    fn demo_deck_builds_a_single_cavity_lattice() {
        let demo = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/final_cooling.toml");
        let out = tempfile::tempdir().unwrap();
        let mut deck_args = args(&demo, &[]);
        deck_args.lattice_file = Some(out.path().join("output/linac.g4bl"));

        let config = build_config(&deck_args).unwrap();
        assert_eq!(config.lattice.do_stochastics, 0);

        let summary = config.lattice.build().unwrap();
        assert_eq!(summary.particle_count, 51);
        assert_eq!(summary.cavity_count, 1);

        let text = std::fs::read_to_string(summary.lattice_path).unwrap();
        assert!(text.contains("pillbox pillbox_1 innerLength=500.0 frequency=0.02"));
        assert!(text.contains("place pillbox_1 z=1000.0"));
        assert!(text.contains("referenceMomentum=205.0356"));
    }

    #[test]
    fn engine_path_prefers_the_command_line() {
        let defaults = DefaultsConfig {
            lattice_filename: PathBuf::from("output/linac.g4bl"),
            engine_path: PathBuf::from("/opt/g4bl/bin/g4bl"),
            csv_filename: "time_energy.csv",
        };
        assert_eq!(
            resolve_engine_path(Some(Path::new("/usr/local/bin/g4bl")), &defaults),
            PathBuf::from("/usr/local/bin/g4bl")
        );
        assert_eq!(
            resolve_engine_path(None, &defaults),
            PathBuf::from("/opt/g4bl/bin/g4bl")
        );
    }
}
