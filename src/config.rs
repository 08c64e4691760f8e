//! Run configuration
//!
//! Everything one run needs, assembled through [`RunConfigBuilder`] and
//! validated once in [`RunConfigBuilder::build`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::poison::{PoisonConfig, DEFAULT_POISON_SEED};
use crate::split::{DEFAULT_SPLIT_SEED, DEFAULT_TEST_FRACTION};
use crate::train::DEFAULT_MAX_DEPTH;
use crate::{Error, Result};

/// Experiment name used when none is given
pub const DEFAULT_EXPERIMENT: &str = "Week 8 - Iris Poisoning";

/// Validated configuration of one training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    data_path: PathBuf,
    max_depth: usize,
    poison: PoisonConfig,
    test_fraction: f64,
    split_seed: u64,
    experiment: String,
}

impl RunConfig {
    /// Start building a configuration for the dataset at `data_path`
    #[must_use]
    pub fn builder(data_path: impl Into<PathBuf>) -> RunConfigBuilder {
        RunConfigBuilder::new(data_path)
    }

    /// Dataset path
    #[must_use]
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Maximum tree depth
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Poisoning parameters
    #[must_use]
    pub const fn poison(&self) -> &PoisonConfig {
        &self.poison
    }

    /// Fraction of rows held out for evaluation
    #[must_use]
    pub const fn test_fraction(&self) -> f64 {
        self.test_fraction
    }

    /// Seed of the stratified shuffle
    #[must_use]
    pub const fn split_seed(&self) -> u64 {
        self.split_seed
    }

    /// Experiment name
    #[must_use]
    pub fn experiment(&self) -> &str {
        &self.experiment
    }

    /// Configuration snapshot recorded with the experiment
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "data_path": self.data_path.display().to_string(),
            "max_depth": self.max_depth,
            "poison_rate": self.poison.rate(),
            "poison_seed": self.poison.seed(),
            "test_fraction": self.test_fraction,
            "split_seed": self.split_seed,
        })
    }
}

/// Builder for [`RunConfig`]
#[derive(Debug, Clone)]
pub struct RunConfigBuilder {
    data_path: PathBuf,
    max_depth: usize,
    poison_rate: f64,
    seed: Option<u64>,
    test_fraction: f64,
    experiment: String,
}

impl RunConfigBuilder {
    /// Create a builder with defaults: depth 3, no poisoning, 40% test split, seed 42
    #[must_use]
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            max_depth: DEFAULT_MAX_DEPTH,
            poison_rate: 0.0,
            seed: None,
            test_fraction: DEFAULT_TEST_FRACTION,
            experiment: DEFAULT_EXPERIMENT.to_string(),
        }
    }

    /// Set the maximum tree depth
    #[must_use]
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the fraction of rows to poison
    #[must_use]
    pub const fn poison_rate(mut self, rate: f64) -> Self {
        self.poison_rate = rate;
        self
    }

    /// Seed both the poisoned-row selection and the split shuffle
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the held-out fraction
    #[must_use]
    pub const fn test_fraction(mut self, fraction: f64) -> Self {
        self.test_fraction = fraction;
        self
    }

    /// Set the experiment name
    #[must_use]
    pub fn experiment(mut self, name: impl Into<String>) -> Self {
        self.experiment = name.into();
        self
    }

    /// Validate and build
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if the depth is zero, the poison rate is
    /// outside `[0, 1]`, the test fraction is outside `(0, 1)`, or the
    /// experiment name is blank
    pub fn build(self) -> Result<RunConfig> {
        if self.max_depth == 0 {
            return Err(Error::InvalidInput("max depth must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.poison_rate) {
            return Err(Error::InvalidInput(format!(
                "poison rate must be in [0, 1], got {}",
                self.poison_rate
            )));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(Error::InvalidInput(format!(
                "test fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if self.experiment.trim().is_empty() {
            return Err(Error::InvalidInput("experiment name is empty".to_string()));
        }

        Ok(RunConfig {
            data_path: self.data_path,
            max_depth: self.max_depth,
            poison: PoisonConfig::new(self.poison_rate)
                .with_seed(self.seed.unwrap_or(DEFAULT_POISON_SEED)),
            test_fraction: self.test_fraction,
            split_seed: self.seed.unwrap_or(DEFAULT_SPLIT_SEED),
            experiment: self.experiment,
        })
    }
}
