//! Decision-tree fitting and held-out evaluation
//!
//! Tree construction is delegated to `linfa-trees`; this module only moves rows
//! from a [`Dataset`] + [`Split`] into linfa's matrix form and scores the
//! predictions.

use linfa::traits::{Fit, Predict};
use linfa_trees::DecisionTree;
use ndarray::Array1;
use serde::Serialize;
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::split::Split;
use crate::{Error, Result};

/// Default maximum tree depth
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Fitted classifier together with the label vocabulary it predicts into
#[derive(Debug, Clone, Serialize)]
pub struct TrainedModel {
    max_depth: usize,
    classes: Vec<String>,
    tree: DecisionTree<f64, usize>,
}

impl TrainedModel {
    /// Depth bound the tree was fitted with
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Class labels, indexed by encoded class id
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Predicted class ids for the given rows
    #[must_use]
    pub fn predict_encoded(&self, dataset: &Dataset, rows: &[usize]) -> Array1<usize> {
        let records = dataset.records(rows);
        self.tree.predict(&records)
    }

    /// Predicted labels for the given rows
    #[must_use]
    pub fn predict(&self, dataset: &Dataset, rows: &[usize]) -> Vec<String> {
        self.predict_encoded(dataset, rows)
            .iter()
            .map(|&id| self.classes.get(id).cloned().unwrap_or_default())
            .collect()
    }

    /// Accuracy on the given rows against their current labels
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if `rows` is empty
    pub fn evaluate(&self, dataset: &Dataset, rows: &[usize]) -> Result<Evaluation> {
        let predicted = self.predict_encoded(dataset, rows);
        let truth = dataset.targets(rows, &self.classes);
        Evaluation::from_predictions(&predicted.to_vec(), &truth.to_vec())
    }

    /// Serialize the fitted model as pretty JSON
    ///
    /// # Errors
    /// Returns [`Error::Json`] if serialization fails
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

/// Held-out score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    correct: usize,
    total: usize,
}

impl Evaluation {
    /// Score predictions against ground truth, position by position
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if the slices differ in length or are empty
    pub fn from_predictions<T: PartialEq>(predicted: &[T], truth: &[T]) -> Result<Self> {
        if predicted.len() != truth.len() {
            return Err(Error::InvalidInput(format!(
                "{} predictions for {} labels",
                predicted.len(),
                truth.len()
            )));
        }
        if truth.is_empty() {
            return Err(Error::InvalidInput(
                "accuracy is undefined for an empty evaluation set".to_string(),
            ));
        }

        let correct = predicted.iter().zip(truth).filter(|(p, t)| p == t).count();
        Ok(Self {
            correct,
            total: truth.len(),
        })
    }

    /// Rows predicted correctly
    #[must_use]
    pub const fn correct(&self) -> usize {
        self.correct
    }

    /// Rows evaluated
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// `correct / total`, in `[0, 1]`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn accuracy(&self) -> f64 {
        self.correct as f64 / self.total as f64
    }
}

/// Depth-bounded decision-tree trainer
#[derive(Debug, Clone, Copy)]
pub struct Trainer {
    max_depth: usize,
}

impl Default for Trainer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl Trainer {
    /// Create a trainer bounded to `max_depth` levels
    #[must_use]
    pub const fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Depth bound
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Fit a tree on the training side of `split`
    ///
    /// # Errors
    /// Returns [`Error::Model`] if linfa rejects the parameters or the data
    pub fn fit(&self, dataset: &Dataset, split: &Split) -> Result<TrainedModel> {
        let classes = dataset.classes();
        let train = linfa::Dataset::new(
            dataset.records(split.train()),
            dataset.targets(split.train(), &classes),
        );

        debug!(
            rows = split.train().len(),
            classes = classes.len(),
            max_depth = self.max_depth,
            "fitting decision tree"
        );

        let tree = DecisionTree::params()
            .max_depth(Some(self.max_depth))
            .fit(&train)
            .map_err(|e| Error::Model(e.to_string()))?;

        Ok(TrainedModel {
            max_depth: self.max_depth,
            classes,
            tree,
        })
    }

    /// Fit on the training rows and score on the held-out rows
    ///
    /// # Errors
    /// See [`fit`](Self::fit) and [`TrainedModel::evaluate`]
    pub fn train_and_evaluate(
        &self,
        dataset: &Dataset,
        split: &Split,
    ) -> Result<(TrainedModel, Evaluation)> {
        let model = self.fit(dataset, split)?;
        let evaluation = model.evaluate(dataset, split.test())?;
        info!(
            accuracy = evaluation.accuracy(),
            "Model training complete. Accuracy: {:.4}",
            evaluation.accuracy()
        );
        Ok((model, evaluation))
    }
}
