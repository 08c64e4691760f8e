//! Param Record - one input parameter of a run

use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A run parameter, stored in its display form.
///
/// Parameters are write-once per run: logging the same key again with a
/// different value is rejected by the sinks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParamRecord {
    run_id: String,
    key: String,
    value: String,
    logged_at: DateTime<Utc>,
}

impl ParamRecord {
    /// Create a parameter record from any displayable value.
    #[must_use]
    pub fn new(run_id: impl Into<String>, key: impl Into<String>, value: impl Display) -> Self {
        Self {
            run_id: run_id.into(),
            key: key.into(),
            value: value.to_string(),
            logged_at: Utc::now(),
        }
    }

    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the parameter name.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the parameter value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Get the time the parameter was logged.
    #[must_use]
    pub const fn logged_at(&self) -> DateTime<Utc> {
        self.logged_at
    }
}
