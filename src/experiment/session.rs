//! Run Session - scoped handle over one tracked run
//!
//! A [`RunSession`] is the only way the pipeline writes to a sink. Opening it
//! registers the experiment and starts a run; the run is always closed, either
//! by [`RunSession::finish`] or, on any early exit, by `Drop` with status
//! [`RunStatus::Failed`].

use std::fmt::Display;

use tracing::{debug, warn};
use uuid::Uuid;

use super::{
    ArtifactRecord, ExperimentRecord, MetricRecord, ParamRecord, RunRecord, RunStatus,
    TrackingSink,
};
use crate::Result;

/// Open run bound to a tracking sink.
pub struct RunSession<'a, S: TrackingSink + ?Sized> {
    sink: &'a mut S,
    run: RunRecord,
    params_logged: usize,
    metrics_logged: usize,
    closed: bool,
}

impl<'a, S: TrackingSink + ?Sized> RunSession<'a, S> {
    /// Register `experiment` and start a new run under it with a random UUID.
    ///
    /// # Errors
    /// Returns the sink's error if the experiment or run cannot be opened
    pub fn start(sink: &'a mut S, experiment: &ExperimentRecord) -> Result<Self> {
        Self::start_with_id(sink, experiment, Uuid::new_v4().to_string())
    }

    /// Register `experiment` and start a run with a caller-chosen ID.
    ///
    /// # Errors
    /// Returns the sink's error if the experiment or run cannot be opened
    pub fn start_with_id(
        sink: &'a mut S,
        experiment: &ExperimentRecord,
        run_id: impl Into<String>,
    ) -> Result<Self> {
        sink.create_experiment(experiment)?;
        let mut run = RunRecord::new(run_id, experiment.experiment_id());
        run.start();
        sink.start_run(&run)?;
        debug!(run_id = run.run_id(), experiment = experiment.name(), "run started");
        Ok(Self {
            sink,
            run,
            params_logged: 0,
            metrics_logged: 0,
            closed: false,
        })
    }

    /// ID of the open run.
    #[must_use]
    pub fn run_id(&self) -> &str {
        self.run.run_id()
    }

    /// Parameters logged so far.
    #[must_use]
    pub const fn params_logged(&self) -> usize {
        self.params_logged
    }

    /// Metric points logged so far.
    #[must_use]
    pub const fn metrics_logged(&self) -> usize {
        self.metrics_logged
    }

    /// Log a parameter.
    ///
    /// # Errors
    /// Returns the sink's error
    pub fn log_param(&mut self, key: &str, value: impl Display) -> Result<()> {
        let param = ParamRecord::new(self.run.run_id(), key, value);
        self.sink.log_param(&param)?;
        self.params_logged += 1;
        Ok(())
    }

    /// Log a single-shot metric.
    ///
    /// # Errors
    /// Returns the sink's error
    pub fn log_metric(&mut self, key: &str, value: f64) -> Result<()> {
        let metric = MetricRecord::new(self.run.run_id(), key, value);
        self.sink.log_metric(&metric)?;
        self.metrics_logged += 1;
        Ok(())
    }

    /// Store `contents` as artifact `key`, returning its record.
    ///
    /// # Errors
    /// Returns the sink's error
    pub fn log_artifact(&mut self, key: &str, contents: &[u8]) -> Result<ArtifactRecord> {
        let artifact = ArtifactRecord::from_bytes(self.run.run_id(), key, contents);
        self.sink.log_artifact(&artifact, contents)?;
        Ok(artifact)
    }

    /// Close the run with `status` and return its final record.
    ///
    /// # Errors
    /// Returns the sink's error; the run is not closed again on drop
    pub fn finish(mut self, status: RunStatus) -> Result<RunRecord> {
        self.close(status)?;
        Ok(self.run.clone())
    }

    fn close(&mut self, status: RunStatus) -> Result<()> {
        self.closed = true;
        self.run.complete(status);
        debug!(run_id = self.run.run_id(), ?status, "run ended");
        self.sink.end_run(&self.run)
    }
}

impl<S: TrackingSink + ?Sized> Drop for RunSession<'_, S> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(e) = self.close(RunStatus::Failed) {
                warn!(run_id = self.run.run_id(), error = %e, "failed to close run");
            }
        }
    }
}
