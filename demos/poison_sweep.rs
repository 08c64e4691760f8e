//! Poison-Rate Sweep Example
//!
//! Trains one tree per poison rate on the same dataset and prints how held-out
//! accuracy degrades as more labels are flipped. Runs are tracked in memory.
//!
//! Run with: cargo run --example poison_sweep -- data/iris.csv

use labelflip::config::RunConfig;
use labelflip::experiment::{ExperimentStore, RunStatus};
use labelflip::pipeline::{run_training, RunOutcome};

const RATES: [f64; 6] = [0.0, 0.05, 0.1, 0.2, 0.3, 0.5];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: poison_sweep <data.csv>");
        std::process::exit(2);
    };

    println!("=== labelflip: poison-rate sweep ===\n");
    println!("Dataset: {path}\n");

    let mut store = ExperimentStore::new();

    // -------------------------------------------------------------------------
    // 1. One run per rate, same seeds
    // -------------------------------------------------------------------------
    println!("{:>12} {:>10} {:>10}", "poison_rate", "poisoned", "accuracy");
    for rate in RATES {
        let config = RunConfig::builder(&path)
            .poison_rate(rate)
            .experiment("Poison Sweep")
            .build()?;

        match run_training(&config, &mut store)? {
            RunOutcome::Completed(summary) => println!(
                "{:>12.2} {:>10} {:>10.4}",
                rate, summary.poisoned, summary.accuracy
            ),
            RunOutcome::DataNotFound { .. } => {
                eprintln!("data file not found: {path}");
                return Ok(());
            }
        }
    }

    // -------------------------------------------------------------------------
    // 2. Store statistics
    // -------------------------------------------------------------------------
    let runs = store.get_runs_for_experiment("poison-sweep");
    let succeeded = runs
        .iter()
        .filter(|r| r.status() == RunStatus::Success)
        .count();

    println!("\nStore statistics:");
    println!("   Experiments: {}", store.experiment_count());
    println!("   Runs: {} ({succeeded} succeeded)", store.run_count());
    println!("   Params: {}", store.param_count());
    println!("   Metrics: {}", store.metric_count());

    println!("\n=== Sweep Complete ===");
    Ok(())
}
