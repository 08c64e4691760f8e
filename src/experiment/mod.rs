//! Experiment Tracking
//!
//! Records the inputs, scores and outputs of each training run.
//!
//! ## Schema Overview
//!
//! ```text
//! ExperimentRecord (1) ──< RunRecord (N)
//!                              │
//!                              ├──< ParamRecord (N)    [write-once]
//!                              ├──< MetricRecord (N)   [step-ordered]
//!                              └──< ArtifactRecord (N) [sha256 CAS]
//! ```
//!
//! Records are written through a [`TrackingSink`]: [`ExperimentStore`] keeps
//! them in memory, [`FileStore`] writes JSON under a directory. Callers open a
//! [`RunSession`] rather than driving a sink by hand.
//!
//! ## Usage
//!
//! ```rust
//! use labelflip::experiment::{ExperimentRecord, ExperimentStore, RunSession, RunStatus};
//!
//! let mut store = ExperimentStore::new();
//! let experiment = ExperimentRecord::from_name("Iris Poisoning");
//!
//! let mut session = RunSession::start(&mut store, &experiment)?;
//! session.log_param("max_depth", 3)?;
//! session.log_metric("accuracy", 0.95)?;
//! let run = session.finish(RunStatus::Success)?;
//!
//! assert_eq!(store.get_param(run.run_id(), "max_depth"), Some("3"));
//! # Ok::<(), labelflip::Error>(())
//! ```

mod artifact_record;
mod experiment_record;
mod file_store;
mod metric_record;
mod param_record;
mod run_record;
mod session;
mod sink;
mod store;

pub use artifact_record::{cas_hash, ArtifactRecord};
pub use experiment_record::{slugify, ExperimentRecord, ExperimentRecordBuilder};
pub use file_store::FileStore;
pub use metric_record::MetricRecord;
pub use param_record::ParamRecord;
pub use run_record::{RunRecord, RunStatus};
pub use session::RunSession;
pub use sink::TrackingSink;
pub use store::ExperimentStore;
