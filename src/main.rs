//! labelflip CLI
//!
//! ```bash
//! labelflip --data data/iris.csv --depth 3 --poison_rate 0.1
//! ```

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use labelflip::cli::{exit_status, Cli};
use labelflip::pipeline::RunOutcome;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_target(false)
        .init();

    let result = cli.execute();
    let status = exit_status(&result);
    if let Err(e) = report(&cli, result) {
        eprintln!("Error: {e:#}");
    }
    ExitCode::from(status)
}

fn report(cli: &Cli, result: labelflip::Result<RunOutcome>) -> anyhow::Result<()> {
    let outcome = result.with_context(|| format!("training run on {}", cli.data.display()))?;

    // A missing data file ends the run without a failure status
    if let RunOutcome::Completed(summary) = outcome {
        println!("run_id={}", summary.run_id);
        println!("accuracy={:.4}", summary.accuracy);
        println!("poisoned={}", summary.poisoned);
        println!("tracking_dir={}", cli.tracking_dir.display());
    }
    Ok(())
}
