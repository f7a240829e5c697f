use crate::engine::error::EngineError;
use crate::engine::lattice::{BuildSummary, LatticeConfiguration};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::runner::{EngineRunner, ExecutionReport};
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    pub build: BuildSummary,
    pub execution: ExecutionReport,
}

/// Builds the lattice only, reporting progress as one stage.
#[instrument(skip_all, name = "build_workflow")]
pub fn build(
    lattice: &LatticeConfiguration,
    reporter: &ProgressReporter,
) -> Result<BuildSummary, EngineError> {
    reporter.report(Progress::StageStart {
        name: "Building lattice",
    });
    let summary = lattice.build_with_progress(reporter)?;
    reporter.report(Progress::StageFinish);
    Ok(summary)
}

/// Builds the lattice and runs the engine on it. Nothing is retried.
#[instrument(skip_all, name = "simulate_workflow")]
pub fn run(
    lattice: &LatticeConfiguration,
    runner: &EngineRunner,
    reporter: &ProgressReporter,
) -> Result<SimulationSummary, EngineError> {
    let build_summary = build(lattice, reporter)?;

    reporter.report(Progress::StageStart {
        name: "Running engine",
    });
    reporter.report(Progress::EngineStarted {
        command: format!(
            "{} {}",
            runner.binary().display(),
            build_summary.lattice_path.display()
        ),
    });
    let result = runner.execute(lattice);
    reporter.report(Progress::EngineFinished {
        success: result.is_ok(),
    });
    let execution = result?;
    reporter.report(Progress::StageFinish);

    info!(
        "Simulation complete: {} particle(s) tracked, log at {:?}.",
        build_summary.particle_count, &execution.log_path
    );
    Ok(SimulationSummary {
        build: build_summary,
        execution,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[test]
    fn run_reports_both_stages_and_returns_paths() {
        let dir = tempdir().unwrap();
        let lattice = LatticeConfiguration::new(dir.path().join("out/linac.g4bl"));
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::StageStart { name } = event {
                events.lock().unwrap().push(name);
            }
        }));

        let summary = run(&lattice, &EngineRunner::new("true"), &reporter).unwrap();
        drop(reporter);

        assert_eq!(
            events.into_inner().unwrap(),
            vec!["Building lattice", "Running engine"]
        );
        assert!(summary.build.lattice_path.exists());
        assert!(summary.execution.log_path.exists());
    }

    #[test]
    fn failed_engine_run_is_reported_and_returned() {
        let dir = tempdir().unwrap();
        let lattice = LatticeConfiguration::new(dir.path().join("out/linac.g4bl"));
        let outcome = Mutex::new(None);
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::EngineFinished { success } = event {
                *outcome.lock().unwrap() = Some(success);
            }
        }));

        let err = run(&lattice, &EngineRunner::new("false"), &reporter).unwrap_err();
        drop(reporter);

        assert!(matches!(err, EngineError::Execution { .. }));
        assert_eq!(outcome.into_inner().unwrap(), Some(false));
    }
}
