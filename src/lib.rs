//! # labelflip: label-poisoning experiments for decision trees
//!
//! Loads a tabular dataset, flips a fraction of its labels, fits a
//! depth-bounded decision tree on a stratified split, and records parameters,
//! accuracy and the serialized model to an experiment tracker.
//!
//! ## Pipeline
//!
//! ```text
//! storage::load_dataset ─> poison::Poisoner ─> split::stratified_split
//!        ─> train::Trainer ─> experiment::RunSession (params, accuracy, model)
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use labelflip::config::RunConfig;
//! use labelflip::experiment::FileStore;
//! use labelflip::pipeline::{run_training, RunOutcome};
//!
//! let config = RunConfig::builder("data/iris.csv")
//!     .max_depth(3)
//!     .poison_rate(0.1)
//!     .build()?;
//!
//! let mut store = FileStore::new("mlruns");
//! if let RunOutcome::Completed(summary) = run_training(&config, &mut store)? {
//!     println!("accuracy {:.4}, {} rows poisoned", summary.accuracy, summary.poisoned);
//! }
//! # Ok::<(), labelflip::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod experiment;
pub mod pipeline;
pub mod poison;
pub mod split;
pub mod storage;
pub mod train;

pub use error::{Error, Result};
