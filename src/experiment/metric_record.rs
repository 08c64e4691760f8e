//! Metric Record - scalar measurements of a run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single metric data point.
///
/// Single-shot metrics (such as held-out accuracy) are logged at step 0;
/// repeated measurements use increasing steps and are read back in step order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricRecord {
    run_id: String,
    key: String,
    step: u64,
    value: f64,
    timestamp: DateTime<Utc>,
}

impl MetricRecord {
    /// Create a metric at step 0.
    #[must_use]
    pub fn new(run_id: impl Into<String>, key: impl Into<String>, value: f64) -> Self {
        Self {
            run_id: run_id.into(),
            key: key.into(),
            step: 0,
            value,
            timestamp: Utc::now(),
        }
    }

    /// Place the metric at a specific step.
    #[must_use]
    pub const fn at_step(mut self, step: u64) -> Self {
        self.step = step;
        self
    }

    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the metric name.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the step.
    #[must_use]
    pub const fn step(&self) -> u64 {
        self.step
    }

    /// Get the metric value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Get the wall-clock time the metric was recorded.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
