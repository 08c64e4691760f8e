//! Experiment Store - in-memory tracking sink
//!
//! Keeps every record in process memory. Used by tests and by callers that
//! want to inspect a run without touching the filesystem.

use std::collections::HashMap;

use super::{
    ArtifactRecord, ExperimentRecord, MetricRecord, ParamRecord, RunRecord, RunStatus,
    TrackingSink,
};
use crate::{Error, Result};

/// In-memory store for experiment tracking data.
///
/// Experiments and runs are keyed by ID; params, metrics and artifacts are
/// append-only vectors filtered per run on read.
#[derive(Debug, Default)]
pub struct ExperimentStore {
    experiments: HashMap<String, ExperimentRecord>,
    runs: HashMap<String, RunRecord>,
    params: Vec<ParamRecord>,
    metrics: Vec<MetricRecord>,
    artifacts: Vec<(ArtifactRecord, Vec<u8>)>,
}

impl ExperimentStore {
    /// Create a new empty experiment store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the store holds nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
            && self.runs.is_empty()
            && self.params.is_empty()
            && self.metrics.is_empty()
            && self.artifacts.is_empty()
    }

    /// Number of experiments.
    #[must_use]
    pub fn experiment_count(&self) -> usize {
        self.experiments.len()
    }

    /// Number of runs.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Number of params across all runs.
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Number of metric points across all runs.
    #[must_use]
    pub fn metric_count(&self) -> usize {
        self.metrics.len()
    }

    /// Get an experiment by ID.
    #[must_use]
    pub fn get_experiment(&self, experiment_id: &str) -> Option<&ExperimentRecord> {
        self.experiments.get(experiment_id)
    }

    /// Get a run by ID.
    #[must_use]
    pub fn get_run(&self, run_id: &str) -> Option<&RunRecord> {
        self.runs.get(run_id)
    }

    /// All runs of an experiment.
    #[must_use]
    pub fn get_runs_for_experiment(&self, experiment_id: &str) -> Vec<&RunRecord> {
        self.runs
            .values()
            .filter(|run| run.experiment_id() == experiment_id)
            .collect()
    }

    /// Value of one param of a run.
    #[must_use]
    pub fn get_param(&self, run_id: &str, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.run_id() == run_id && p.key() == key)
            .map(ParamRecord::value)
    }

    /// All params of a run, in logging order.
    #[must_use]
    pub fn get_params_for_run(&self, run_id: &str) -> Vec<&ParamRecord> {
        self.params.iter().filter(|p| p.run_id() == run_id).collect()
    }

    /// Metrics of a run for one key, ordered by step.
    #[must_use]
    pub fn get_metrics_for_run(&self, run_id: &str, key: &str) -> Vec<MetricRecord> {
        let mut metrics: Vec<MetricRecord> = self
            .metrics
            .iter()
            .filter(|m| m.run_id() == run_id && m.key() == key)
            .cloned()
            .collect();
        metrics.sort_by_key(MetricRecord::step);
        metrics
    }

    /// Artifact records of a run.
    #[must_use]
    pub fn get_artifacts_for_run(&self, run_id: &str) -> Vec<&ArtifactRecord> {
        self.artifacts
            .iter()
            .map(|(record, _)| record)
            .filter(|a| a.run_id() == run_id)
            .collect()
    }

    /// Stored bytes of one artifact.
    #[must_use]
    pub fn artifact_contents(&self, run_id: &str, key: &str) -> Option<&[u8]> {
        self.artifacts
            .iter()
            .find(|(a, _)| a.run_id() == run_id && a.key() == key)
            .map(|(_, bytes)| bytes.as_slice())
    }

    fn require_running(&self, run_id: &str) -> Result<()> {
        match self.runs.get(run_id) {
            Some(run) if run.status() == RunStatus::Running => Ok(()),
            Some(_) => Err(Error::Tracking(format!("run {run_id} is not running"))),
            None => Err(Error::Tracking(format!("unknown run {run_id}"))),
        }
    }
}

impl TrackingSink for ExperimentStore {
    fn create_experiment(&mut self, experiment: &ExperimentRecord) -> Result<()> {
        self.experiments
            .entry(experiment.experiment_id().to_string())
            .or_insert_with(|| experiment.clone());
        Ok(())
    }

    fn start_run(&mut self, run: &RunRecord) -> Result<()> {
        if self.runs.contains_key(run.run_id()) {
            return Err(Error::Tracking(format!("run {} already exists", run.run_id())));
        }
        self.runs.insert(run.run_id().to_string(), run.clone());
        Ok(())
    }

    fn log_param(&mut self, param: &ParamRecord) -> Result<()> {
        self.require_running(param.run_id())?;
        match self.get_param(param.run_id(), param.key()) {
            Some(existing) if existing == param.value() => Ok(()),
            Some(existing) => Err(Error::Tracking(format!(
                "param {} already logged as {existing}",
                param.key()
            ))),
            None => {
                self.params.push(param.clone());
                Ok(())
            }
        }
    }

    fn log_metric(&mut self, metric: &MetricRecord) -> Result<()> {
        self.require_running(metric.run_id())?;
        self.metrics.push(metric.clone());
        Ok(())
    }

    fn log_artifact(&mut self, artifact: &ArtifactRecord, contents: &[u8]) -> Result<()> {
        self.require_running(artifact.run_id())?;
        self.artifacts.push((artifact.clone(), contents.to_vec()));
        Ok(())
    }

    fn end_run(&mut self, run: &RunRecord) -> Result<()> {
        self.require_running(run.run_id())?;
        self.runs.insert(run.run_id().to_string(), run.clone());
        Ok(())
    }
}
