//! cadence-pic: runs the particle-in-cell control model.
//!
//! With `--control-model` or `--control-model-sorted` it writes the
//! model as Graphviz DOT and exits without stepping.

mod model;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use cadence::graph::{control_model, sorted_model};
use cadence::prelude::*;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "cadence-pic")]
#[command(about = "Run the particle-in-cell control model")]
struct Cli {
    /// Number of simulation steps to run
    #[arg(long, default_value = "5")]
    steps: u64,

    /// Write the declared control model as DOT to this path and exit
    #[arg(long, value_name = "PATH")]
    control_model: Option<PathBuf>,

    /// Write the sorted control model as DOT to this path and exit
    #[arg(long, value_name = "PATH")]
    control_model_sorted: Option<PathBuf>,

    /// Keep running after an action fails, skipping the rest of its phase
    #[arg(long)]
    abort_phase: bool,

    /// Make restart_dump fail at this step
    #[arg(long, value_name = "STEP")]
    fail_step: Option<u64>,
}

fn write_dot(path: &Path, dot: impl std::fmt::Display) -> anyhow::Result<()> {
    std::fs::write(path, dot.to_string())
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let policy = if cli.abort_phase {
        FailurePolicy::AbortPhase
    } else {
        FailurePolicy::AbortRun
    };
    let config = model::config(cli.steps, policy, std::env::args().collect());
    let mut sched = Scheduler::new(config).context("invalid scheduler configuration")?;
    let registrations =
        model::registrations(cli.fail_step).context("invalid attribute flags")?;
    sched
        .apply(registrations)
        .context("failed to register the control model")?;

    if let Some(path) = &cli.control_model {
        write_dot(path, control_model(sched.registry()))?;
        return Ok(ExitCode::SUCCESS);
    }

    sched.init().context("failed to initialize the scheduler")?;

    if let Some(path) = &cli.control_model_sorted {
        write_dot(path, sorted_model(sched.registry())?)?;
        return Ok(ExitCode::SUCCESS);
    }

    sched.on_failure(|failure| error!("{failure}"));

    match sched.execute() {
        Ok(summary) => {
            info!(
                steps = summary.steps,
                actions = summary.actions_executed,
                failures = summary.failures.len(),
                "simulation finished"
            );
            Ok(exit_code(summary.exit_code()))
        }
        Err(StepError::ActionFailed(failure)) => {
            error!(step = failure.step.0, "run aborted");
            Ok(exit_code(failure.exit_code()))
        }
        Err(e) => Err(e).context("simulation failed"),
    }
}
