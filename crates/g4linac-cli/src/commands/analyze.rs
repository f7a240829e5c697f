use crate::cli::AnalyzeArgs;
use crate::config::builder;
use crate::config::defaults::DefaultsConfig;
use crate::error::Result;
use g4linac::workflows;
use tracing::info;

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let defaults = DefaultsConfig::default();
    let config = builder::build_config(&args.deck)?;

    let csv_path = match args.output {
        Some(path) => path,
        None => config.lattice.output_dir()?.join(defaults.csv_filename),
    };
    info!("Writing time/energy distribution to {:?}", &csv_path);

    let summary = workflows::analyze::run(&config.lattice, &csv_path)?;
    println!(
        "✓ Read {} z plane(s) from {}",
        summary.bunch_count,
        summary.source.display()
    );
    println!(
        "  z = {} mm and z = {} mm written to: {}",
        summary.first_z,
        summary.last_z,
        summary.csv_path.display()
    );
    Ok(())
}
