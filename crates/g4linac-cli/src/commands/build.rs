use crate::cli::BuildArgs;
use crate::config::builder;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use g4linac::engine::progress::ProgressReporter;
use g4linac::workflows;
use tracing::info;

pub fn run(args: BuildArgs) -> Result<()> {
    let mut config = builder::build_config(&args.deck)?;
    if args.no_cleanup {
        config.lattice.cleanup_dir = false;
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Building lattice from {}...", config.deck_path.display());
    info!("Invoking the core build workflow...");
    let summary = workflows::simulate::build(&config.lattice, &reporter)?;

    println!(
        "✓ Lattice written to: {}",
        summary.lattice_path.display()
    );
    println!(
        "  Beam: {} particle(s) in {}",
        summary.particle_count,
        summary.track_file.display()
    );
    println!("  RF cavities: {}", summary.cavity_count);
    Ok(())
}
