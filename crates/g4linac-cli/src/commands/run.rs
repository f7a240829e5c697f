use crate::cli::RunArgs;
use crate::config::builder;
use crate::config::defaults::DefaultsConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use g4linac::engine::progress::ProgressReporter;
use g4linac::engine::runner::EngineRunner;
use g4linac::workflows;
use tracing::info;

pub fn run(args: RunArgs) -> Result<()> {
    let defaults = DefaultsConfig::default();
    let mut config = builder::build_config(&args.build.deck)?;
    if args.build.no_cleanup {
        config.lattice.cleanup_dir = false;
    }

    let engine = builder::resolve_engine_path(args.engine.as_deref(), &defaults);
    info!("Using engine binary {:?}", &engine);
    let runner = EngineRunner::new(engine);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting simulation from {}...", config.deck_path.display());
    let summary = workflows::simulate::run(&config.lattice, &runner, &reporter)?;

    println!(
        "✓ Engine finished. Output: {}",
        summary.execution.output_path.display()
    );
    println!("  Log: {}", summary.execution.log_path.display());

    if let Some(csv_path) = &args.analyze {
        let analysis = workflows::analyze::run(&config.lattice, csv_path)?;
        println!(
            "✓ Time/energy distribution ({} z plane(s)) written to: {}",
            analysis.bunch_count,
            analysis.csv_path.display()
        );
    }
    Ok(())
}
