//! File Store - JSON-on-disk tracking sink
//!
//! Layout under the root directory:
//!
//! ```text
//! <root>/<experiment_id>/experiment.json
//! <root>/<experiment_id>/<run_id>/run.json
//! <root>/<experiment_id>/<run_id>/params.json
//! <root>/<experiment_id>/<run_id>/metrics.jsonl
//! <root>/<experiment_id>/<run_id>/artifacts.json
//! <root>/<experiment_id>/<run_id>/artifacts/<key>
//! ```
//!
//! `run.json` is written on `start_run` and rewritten on `end_run`, so a run
//! that never closed is visible on disk with status `Running`.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{
    ArtifactRecord, ExperimentRecord, MetricRecord, ParamRecord, RunRecord, TrackingSink,
};
use crate::{Error, Result};

const EXPERIMENT_FILE: &str = "experiment.json";
const RUN_FILE: &str = "run.json";
const PARAMS_FILE: &str = "params.json";
const METRICS_FILE: &str = "metrics.jsonl";
const ARTIFACTS_FILE: &str = "artifacts.json";
const ARTIFACTS_DIR: &str = "artifacts";

/// Directory-backed tracking sink.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    /// Directories of runs opened through this handle
    open_runs: HashMap<String, PathBuf>,
}

impl FileStore {
    /// Create a store rooted at `root`. Directories are created lazily.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            open_runs: HashMap::new(),
        }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of an experiment.
    #[must_use]
    pub fn experiment_dir(&self, experiment_id: &str) -> PathBuf {
        self.root.join(experiment_id)
    }

    /// Directory of a run.
    #[must_use]
    pub fn run_dir(&self, experiment_id: &str, run_id: &str) -> PathBuf {
        self.experiment_dir(experiment_id).join(run_id)
    }

    /// Read an experiment record back.
    ///
    /// # Errors
    /// Returns an IO or JSON error if the record is missing or corrupt
    pub fn load_experiment(&self, experiment_id: &str) -> Result<ExperimentRecord> {
        read_json(&self.experiment_dir(experiment_id).join(EXPERIMENT_FILE))
    }

    /// Read a run record back.
    ///
    /// # Errors
    /// Returns an IO or JSON error if the record is missing or corrupt
    pub fn load_run(&self, experiment_id: &str, run_id: &str) -> Result<RunRecord> {
        read_json(&self.run_dir(experiment_id, run_id).join(RUN_FILE))
    }

    /// All runs of an experiment, sorted by start time.
    ///
    /// # Errors
    /// Returns an error if a run directory holds a corrupt `run.json`
    pub fn list_runs(&self, experiment_id: &str) -> Result<Vec<RunRecord>> {
        let dir = self.experiment_dir(experiment_id);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut runs = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path().join(RUN_FILE);
            if path.is_file() {
                runs.push(read_json::<RunRecord>(&path)?);
            }
        }
        runs.sort_by_key(RunRecord::started_at);
        Ok(runs)
    }

    /// Params of a run as a key -> value map.
    ///
    /// # Errors
    /// Returns an error if the params file is corrupt
    pub fn load_params(&self, experiment_id: &str, run_id: &str) -> Result<BTreeMap<String, String>> {
        read_json_or_default(&self.run_dir(experiment_id, run_id).join(PARAMS_FILE))
    }

    /// Metrics of a run, in logging order.
    ///
    /// # Errors
    /// Returns an error if a metrics line is corrupt
    pub fn load_metrics(&self, experiment_id: &str, run_id: &str) -> Result<Vec<MetricRecord>> {
        let path = self.run_dir(experiment_id, run_id).join(METRICS_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(fs::File::open(path)?);
        let mut metrics = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                metrics.push(serde_json::from_str(&line)?);
            }
        }
        Ok(metrics)
    }

    /// Artifact records of a run.
    ///
    /// # Errors
    /// Returns an error if the artifact index is corrupt
    pub fn load_artifacts(&self, experiment_id: &str, run_id: &str) -> Result<Vec<ArtifactRecord>> {
        read_json_or_default(&self.run_dir(experiment_id, run_id).join(ARTIFACTS_FILE))
    }

    /// Path of a stored artifact.
    #[must_use]
    pub fn artifact_path(&self, experiment_id: &str, run_id: &str, key: &str) -> PathBuf {
        self.run_dir(experiment_id, run_id).join(ARTIFACTS_DIR).join(key)
    }

    fn open_run_dir(&self, run_id: &str) -> Result<&Path> {
        self.open_runs
            .get(run_id)
            .map(PathBuf::as_path)
            .ok_or_else(|| Error::Tracking(format!("run {run_id} is not open")))
    }
}

impl TrackingSink for FileStore {
    fn create_experiment(&mut self, experiment: &ExperimentRecord) -> Result<()> {
        let dir = self.experiment_dir(experiment.experiment_id());
        fs::create_dir_all(&dir)?;
        let path = dir.join(EXPERIMENT_FILE);
        if !path.exists() {
            write_json(&path, experiment)?;
            debug!(experiment = experiment.experiment_id(), "experiment created");
        }
        Ok(())
    }

    fn start_run(&mut self, run: &RunRecord) -> Result<()> {
        let dir = self.run_dir(run.experiment_id(), run.run_id());
        if dir.exists() {
            return Err(Error::Tracking(format!("run {} already exists", run.run_id())));
        }
        fs::create_dir_all(&dir)?;
        write_json(&dir.join(RUN_FILE), run)?;
        self.open_runs.insert(run.run_id().to_string(), dir);
        Ok(())
    }

    fn log_param(&mut self, param: &ParamRecord) -> Result<()> {
        let path = self.open_run_dir(param.run_id())?.join(PARAMS_FILE);
        let mut params: BTreeMap<String, String> = read_json_or_default(&path)?;
        match params.get(param.key()) {
            Some(existing) if existing == param.value() => return Ok(()),
            Some(existing) => {
                return Err(Error::Tracking(format!(
                    "param {} already logged as {existing}",
                    param.key()
                )))
            }
            None => {}
        }
        params.insert(param.key().to_string(), param.value().to_string());
        write_json(&path, &params)
    }

    fn log_metric(&mut self, metric: &MetricRecord) -> Result<()> {
        let path = self.open_run_dir(metric.run_id())?.join(METRICS_FILE);
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let line = serde_json::to_string(metric)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    fn log_artifact(&mut self, artifact: &ArtifactRecord, contents: &[u8]) -> Result<()> {
        let key = artifact.key();
        if key.is_empty() || key.contains(&['/', '\\'][..]) || key == "." || key == ".." {
            return Err(Error::Tracking(format!("invalid artifact key {key:?}")));
        }

        let dir = self.open_run_dir(artifact.run_id())?.to_path_buf();
        let artifacts_dir = dir.join(ARTIFACTS_DIR);
        fs::create_dir_all(&artifacts_dir)?;
        fs::write(artifacts_dir.join(key), contents)?;

        let index = dir.join(ARTIFACTS_FILE);
        let mut records: Vec<ArtifactRecord> = read_json_or_default(&index)?;
        records.retain(|r| r.key() != key);
        records.push(artifact.clone());
        write_json(&index, &records)
    }

    fn end_run(&mut self, run: &RunRecord) -> Result<()> {
        let dir = self
            .open_runs
            .remove(run.run_id())
            .ok_or_else(|| Error::Tracking(format!("run {} is not open", run.run_id())))?;
        write_json(&dir.join(RUN_FILE), run)
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if path.exists() {
        read_json(path)
    } else {
        Ok(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::RunStatus;

    fn open_run(store: &mut FileStore) -> RunRecord {
        let experiment = ExperimentRecord::new("exp", "Exp");
        store.create_experiment(&experiment).unwrap();
        let mut run = RunRecord::new("run-a", "exp");
        run.start();
        store.start_run(&run).unwrap();
        run
    }

    #[test]
    fn test_round_trip_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path());
        let mut run = open_run(&mut store);

        store.log_param(&ParamRecord::new("run-a", "max_depth", 3)).unwrap();
        store.log_metric(&MetricRecord::new("run-a", "accuracy", 0.9)).unwrap();
        let artifact = ArtifactRecord::from_bytes("run-a", "model", b"{\"tree\":1}");
        store.log_artifact(&artifact, b"{\"tree\":1}").unwrap();
        run.complete(RunStatus::Success);
        store.end_run(&run).unwrap();

        assert_eq!(store.load_experiment("exp").unwrap().name(), "Exp");
        assert_eq!(store.load_run("exp", "run-a").unwrap().status(), RunStatus::Success);
        assert_eq!(store.load_params("exp", "run-a").unwrap()["max_depth"], "3");
        assert_eq!(store.load_metrics("exp", "run-a").unwrap().len(), 1);
        let stored = fs::read(store.artifact_path("exp", "run-a", "model")).unwrap();
        assert!(store.load_artifacts("exp", "run-a").unwrap()[0].matches(&stored));
    }

    #[test]
    fn test_unclosed_run_visible_as_running() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path());
        open_run(&mut store);
        let runs = store.list_runs("exp").unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].status(), RunStatus::Running);
    }

    #[test]
    fn test_rejects_path_like_artifact_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path());
        open_run(&mut store);
        let artifact = ArtifactRecord::from_bytes("run-a", "../escape", b"x");
        assert!(store.log_artifact(&artifact, b"x").is_err());
    }

    #[test]
    fn test_writes_after_end_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path());
        let mut run = open_run(&mut store);
        run.complete(RunStatus::Failed);
        store.end_run(&run).unwrap();
        let err = store.log_metric(&MetricRecord::new("run-a", "accuracy", 1.0)).unwrap_err();
        assert!(matches!(err, Error::Tracking(_)));
    }
}
