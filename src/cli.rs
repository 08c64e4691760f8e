//! Command-line interface

use std::path::PathBuf;

use clap::Parser;

use crate::config::{RunConfig, DEFAULT_EXPERIMENT};
use crate::experiment::FileStore;
use crate::pipeline::{run_training, RunOutcome};
use crate::poison::DEFAULT_POISON_SEED;
use crate::train::DEFAULT_MAX_DEPTH;
use crate::Result;

/// Train a decision tree on optionally label-poisoned data and track the run
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "labelflip")]
#[command(version)]
pub struct Cli {
    /// Path to the training data (CSV with header, or Parquet)
    #[arg(long, value_name = "PATH")]
    pub data: PathBuf,

    /// Max depth for the decision tree
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub depth: usize,

    /// Fraction of rows to poison (e.g. 0.05 for 5%)
    #[arg(long = "poison_rate", visible_alias = "poison-rate", default_value_t = 0.0)]
    pub poison_rate: f64,

    /// Experiment the run is recorded under
    #[arg(long, default_value = DEFAULT_EXPERIMENT)]
    pub experiment: String,

    /// Directory of the local experiment tracking store
    #[arg(long, value_name = "DIR", default_value = "mlruns")]
    pub tracking_dir: PathBuf,

    /// Seed for poisoned-row selection and the train/test shuffle
    #[arg(long, default_value_t = DEFAULT_POISON_SEED)]
    pub seed: u64,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Build the run configuration from the parsed flags
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`](crate::Error::InvalidInput) if a flag is out of range
    pub fn to_config(&self) -> Result<RunConfig> {
        RunConfig::builder(&self.data)
            .max_depth(self.depth)
            .poison_rate(self.poison_rate)
            .seed(self.seed)
            .experiment(&self.experiment)
            .build()
    }

    /// Run the pipeline against a [`FileStore`] rooted at `--tracking-dir`
    ///
    /// # Errors
    /// Returns invalid-flag errors and every pipeline error except a missing dataset
    pub fn execute(&self) -> Result<RunOutcome> {
        let config = self.to_config()?;
        let mut store = FileStore::new(&self.tracking_dir);
        run_training(&config, &mut store)
    }

    /// Default log filter for the chosen verbosity (overridden by `RUST_LOG`)
    #[must_use]
    pub const fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

/// Process exit status for a run result
///
/// A missing data file is not a failure: the empty run is already tracked.
#[must_use]
pub const fn exit_status(result: &Result<RunOutcome>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
