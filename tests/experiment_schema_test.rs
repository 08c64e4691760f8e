//! Experiment tracking schema tests

use labelflip::experiment::{
    ArtifactRecord, ExperimentRecord, ExperimentStore, MetricRecord, ParamRecord, RunRecord,
    RunSession, RunStatus, TrackingSink,
};

// =============================================================================
// Records
// =============================================================================

#[test]
fn test_experiment_record_creation() {
    let record = ExperimentRecord::new("exp-001", "My Experiment");

    assert_eq!(record.experiment_id(), "exp-001");
    assert_eq!(record.name(), "My Experiment");
    assert!(record.created_at().timestamp() > 0);
    assert!(record.config().is_none());
}

#[test]
fn test_experiment_record_serialization() {
    let record = ExperimentRecord::builder("exp-003", "Serialization Test")
        .config(serde_json::json!({"max_depth": 3}))
        .build();

    let json = serde_json::to_string(&record).expect("serialization failed");
    let deserialized: ExperimentRecord =
        serde_json::from_str(&json).expect("deserialization failed");

    assert_eq!(record, deserialized);
}

#[test]
fn test_run_record_complete_failed() {
    let mut run = RunRecord::new("run-004", "exp-001");
    run.start();
    run.complete(RunStatus::Failed);

    assert_eq!(run.status(), RunStatus::Failed);
    assert!(run.ended_at().unwrap() >= run.started_at().unwrap());
}

#[test]
fn test_run_status_serialization() {
    let json = serde_json::to_string(&RunStatus::Success).unwrap();
    assert_eq!(json, "\"Success\"");
}

#[test]
fn test_param_record_keeps_display_form() {
    let param = ParamRecord::new("run-1", "poison_rate", 0.05);
    assert_eq!(param.key(), "poison_rate");
    assert_eq!(param.value(), "0.05");
}

#[test]
fn test_artifact_record_hash_is_content_addressed() {
    let a = ArtifactRecord::from_bytes("run-1", "model", b"same");
    let b = ArtifactRecord::from_bytes("run-2", "other", b"same");
    assert_eq!(a.cas_hash(), b.cas_hash());
    assert_eq!(a.cas_hash().len(), "sha256:".len() + 64);
}

// =============================================================================
// Sessions over the in-memory store
// =============================================================================

#[test]
fn test_session_full_lifecycle() {
    let mut store = ExperimentStore::new();
    let experiment = ExperimentRecord::from_name("Week 8 - Iris Poisoning");

    let mut session = RunSession::start(&mut store, &experiment).unwrap();
    session.log_param("max_depth", 3).unwrap();
    session.log_param("poison_rate", 0.1).unwrap();
    session.log_metric("accuracy", 0.9).unwrap();
    let artifact = session.log_artifact("model", b"{}").unwrap();
    let run = session.finish(RunStatus::Success).unwrap();

    assert_eq!(store.experiment_count(), 1);
    assert_eq!(store.get_runs_for_experiment("week-8-iris-poisoning").len(), 1);
    assert_eq!(store.get_params_for_run(run.run_id()).len(), 2);
    assert_eq!(store.artifact_contents(run.run_id(), "model"), Some(&b"{}"[..]));
    assert_eq!(artifact.run_id(), run.run_id());
}

#[test]
fn test_session_dropped_early_is_closed_failed() {
    let mut store = ExperimentStore::new();
    let experiment = ExperimentRecord::from_name("early exit");
    let run_id = {
        let session = RunSession::start(&mut store, &experiment).unwrap();
        session.run_id().to_string()
    };

    let run = store.get_run(&run_id).unwrap();
    assert_eq!(run.status(), RunStatus::Failed);
    assert!(store.get_params_for_run(&run_id).is_empty());
}

#[test]
fn test_duplicate_run_id_rejected() {
    let mut store = ExperimentStore::new();
    let mut run = RunRecord::new("dup", "exp");
    run.start();
    store.start_run(&run).unwrap();
    assert!(store.start_run(&run).is_err());
}

#[test]
fn test_metric_written_to_closed_run_rejected() {
    let mut store = ExperimentStore::new();
    let experiment = ExperimentRecord::from_name("closed");
    let run = RunSession::start(&mut store, &experiment)
        .unwrap()
        .finish(RunStatus::Success)
        .unwrap();

    let late = MetricRecord::new(run.run_id(), "accuracy", 1.0);
    assert!(store.log_metric(&late).is_err());
}
