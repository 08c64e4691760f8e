//! Tracking sink - the write side of experiment tracking

use super::{ArtifactRecord, ExperimentRecord, MetricRecord, ParamRecord, RunRecord};
use crate::Result;

/// Destination for experiment tracking records.
///
/// The pipeline never talks to a sink directly; it goes through a
/// [`RunSession`](super::RunSession), which guarantees `end_run` is called.
pub trait TrackingSink {
    /// Register an experiment. Registering an existing ID is a no-op.
    ///
    /// # Errors
    /// Returns an error if the sink cannot persist the record
    fn create_experiment(&mut self, experiment: &ExperimentRecord) -> Result<()>;

    /// Open a run.
    ///
    /// # Errors
    /// Returns [`Error::Tracking`](crate::Error::Tracking) if the run ID is already in use
    fn start_run(&mut self, run: &RunRecord) -> Result<()>;

    /// Record a parameter of an open run.
    ///
    /// # Errors
    /// Returns [`Error::Tracking`](crate::Error::Tracking) if the run is not open or
    /// the key already holds a different value
    fn log_param(&mut self, param: &ParamRecord) -> Result<()>;

    /// Record a metric of an open run.
    ///
    /// # Errors
    /// Returns [`Error::Tracking`](crate::Error::Tracking) if the run is not open
    fn log_metric(&mut self, metric: &MetricRecord) -> Result<()>;

    /// Store artifact bytes for an open run.
    ///
    /// # Errors
    /// Returns [`Error::Tracking`](crate::Error::Tracking) if the run is not open
    fn log_artifact(&mut self, artifact: &ArtifactRecord, contents: &[u8]) -> Result<()>;

    /// Close a run, persisting its final status.
    ///
    /// # Errors
    /// Returns [`Error::Tracking`](crate::Error::Tracking) if the run is not open
    fn end_run(&mut self, run: &RunRecord) -> Result<()>;
}

impl<S: TrackingSink + ?Sized> TrackingSink for &mut S {
    fn create_experiment(&mut self, experiment: &ExperimentRecord) -> Result<()> {
        (**self).create_experiment(experiment)
    }

    fn start_run(&mut self, run: &RunRecord) -> Result<()> {
        (**self).start_run(run)
    }

    fn log_param(&mut self, param: &ParamRecord) -> Result<()> {
        (**self).log_param(param)
    }

    fn log_metric(&mut self, metric: &MetricRecord) -> Result<()> {
        (**self).log_metric(metric)
    }

    fn log_artifact(&mut self, artifact: &ArtifactRecord, contents: &[u8]) -> Result<()> {
        (**self).log_artifact(artifact, contents)
    }

    fn end_run(&mut self, run: &RunRecord) -> Result<()> {
        (**self).end_run(run)
    }
}
