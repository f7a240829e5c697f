use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "g4linac - builds G4beamline lattice decks for linac cooling studies, runs the engine, and extracts the resulting time/energy distributions.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the lattice file and the beam track file without running the engine.
    Build(BuildArgs),
    /// Build the lattice, then run the engine on it.
    Run(RunArgs),
    /// Extract the time/energy distribution from a finished run's output.
    Analyze(AnalyzeArgs),
    /// List the recognised keys of every deck section.
    Fields,
}

/// Where the deck comes from and how it is overridden.
#[derive(Args, Debug, Clone)]
pub struct DeckArgs {
    /// Path to the lattice deck in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub deck: PathBuf,

    /// Override `lattice.lattice_filename`; its parent directory receives every output.
    #[arg(short, long, value_name = "PATH")]
    pub lattice_file: Option<PathBuf>,

    /// Set a specific deck value, overriding the deck file.
    /// Can be used multiple times. Example: -S reference.p_start=210.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub deck: DeckArgs,

    /// Keep an existing output directory instead of recreating it.
    #[arg(long)]
    pub no_cleanup: bool,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Path to the engine binary.
    #[arg(short, long, env = "G4BL_PATH", value_name = "PATH")]
    pub engine: Option<PathBuf>,

    /// After a successful run, write the time/energy CSV to this path.
    #[arg(long, value_name = "PATH")]
    pub analyze: Option<PathBuf>,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub deck: DeckArgs,

    /// Destination CSV. Defaults to `time_energy.csv` in the output directory.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
