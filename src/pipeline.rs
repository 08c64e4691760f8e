//! Run orchestration: load → poison → split → fit → evaluate → track
//!
//! The tracking session is opened before anything else and is closed on every
//! exit path. A missing dataset is the one failure handled here: the run is
//! closed without params or metrics and [`RunOutcome::DataNotFound`] is
//! returned. Any other failure propagates after the session closes as failed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{error, info};

use crate::config::RunConfig;
use crate::experiment::{ExperimentRecord, RunSession, RunStatus, TrackingSink};
use crate::poison::Poisoner;
use crate::split::stratified_split;
use crate::storage::load_dataset;
use crate::train::Trainer;
use crate::{Error, Result};

/// Artifact key of the serialized model
pub const MODEL_ARTIFACT: &str = "model";

/// Result of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Tracking run ID
    pub run_id: String,
    /// Held-out accuracy
    pub accuracy: f64,
    /// Rows whose label was flipped
    pub poisoned: usize,
    /// Training rows
    pub train_rows: usize,
    /// Held-out rows
    pub test_rows: usize,
    /// Content hash of the logged model
    pub model_hash: String,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Pipeline ran to completion
    Completed(RunSummary),
    /// Dataset path did not resolve; nothing but the empty run was recorded
    DataNotFound {
        /// Tracking run ID of the empty run
        run_id: String,
    },
}

/// Run the pipeline with an entropy-seeded label-replacement source
///
/// # Errors
/// Returns any error other than a missing dataset; see [`run_training_with`]
pub fn run_training<S: TrackingSink + ?Sized>(
    config: &RunConfig,
    sink: &mut S,
) -> Result<RunOutcome> {
    let mut replace_rng = StdRng::from_entropy();
    run_training_with(config, sink, &mut replace_rng)
}

/// Run the pipeline with a caller-supplied label-replacement source
///
/// # Errors
/// - [`Error::InsufficientStratificationData`] if the labels cannot be split
/// - [`Error::MalformedData`] if the dataset cannot be decoded
/// - any tracking, model or IO error
pub fn run_training_with<S, R>(
    config: &RunConfig,
    sink: &mut S,
    replace_rng: &mut R,
) -> Result<RunOutcome>
where
    S: TrackingSink + ?Sized,
    R: Rng + ?Sized,
{
    info!(
        poison_rate = config.poison().rate(),
        max_depth = config.max_depth(),
        "--- Starting run: poison_rate={}, max_depth={} ---",
        config.poison().rate(),
        config.max_depth()
    );

    let experiment = ExperimentRecord::builder(
        crate::experiment::slugify(config.experiment()),
        config.experiment(),
    )
    .config(config.to_json())
    .build();
    let mut session = RunSession::start(sink, &experiment)?;

    let mut dataset = match load_dataset(config.data_path()) {
        Ok(dataset) => dataset,
        Err(Error::DataNotFound(path)) => {
            error!("Error: Data file not found at {}", path.display());
            let run = session.finish(RunStatus::Failed)?;
            return Ok(RunOutcome::DataNotFound {
                run_id: run.run_id().to_string(),
            });
        }
        Err(e) => return Err(e),
    };

    session.log_param("max_depth", config.max_depth())?;
    session.log_param("poison_rate", config.poison().rate())?;

    let report = Poisoner::new(*config.poison()).poison_with(&mut dataset, replace_rng)?;

    let split = stratified_split(&dataset.labels(), config.test_fraction(), config.split_seed())?;
    let (model, evaluation) =
        Trainer::new(config.max_depth()).train_and_evaluate(&dataset, &split)?;

    session.log_metric("accuracy", evaluation.accuracy())?;

    let artifact = session.log_artifact(MODEL_ARTIFACT, &model.to_json()?)?;
    info!(hash = artifact.cas_hash(), "Model logged to experiment tracker.");

    let run = session.finish(RunStatus::Success)?;
    Ok(RunOutcome::Completed(RunSummary {
        run_id: run.run_id().to_string(),
        accuracy: evaluation.accuracy(),
        poisoned: report.poisoned(),
        train_rows: split.train().len(),
        test_rows: split.test().len(),
        model_hash: artifact.cas_hash().to_string(),
    }))
}
