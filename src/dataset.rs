//! In-memory tabular dataset: four numeric features plus a categorical label
//!
//! Rows are kept in load order. The label column is the only mutable part of a
//! loaded dataset; poisoning rewrites it in place.

use ndarray::{Array1, Array2};

/// Number of feature columns
pub const NUM_FEATURES: usize = 4;

/// Feature column names, in matrix column order
pub const FEATURE_NAMES: [&str; NUM_FEATURES] =
    ["sepal_length", "sepal_width", "petal_length", "petal_width"];

/// Label column name
pub const LABEL_COLUMN: &str = "species";

/// A single dataset row
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Feature values in [`FEATURE_NAMES`] order
    pub features: [f64; NUM_FEATURES],
    /// Class label
    pub label: String,
}

impl Sample {
    /// Create a new row
    #[must_use]
    pub fn new(features: [f64; NUM_FEATURES], label: impl Into<String>) -> Self {
        Self {
            features,
            label: label.into(),
        }
    }
}

/// Ordered collection of labelled rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    /// Create a dataset from rows
    #[must_use]
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the dataset has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All rows
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Label of the row at `index`
    #[must_use]
    pub fn label(&self, index: usize) -> Option<&str> {
        self.samples.get(index).map(|s| s.label.as_str())
    }

    /// Overwrite the label of the row at `index`, returning the previous label
    ///
    /// Returns `None` (and changes nothing) if `index` is out of bounds.
    pub fn set_label(&mut self, index: usize, label: impl Into<String>) -> Option<String> {
        self.samples
            .get_mut(index)
            .map(|s| std::mem::replace(&mut s.label, label.into()))
    }

    /// Labels of every row, in row order
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.samples.iter().map(|s| s.label.as_str()).collect()
    }

    /// Distinct labels in order of first appearance
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        let mut classes: Vec<String> = Vec::new();
        for sample in &self.samples {
            if !classes.contains(&sample.label) {
                classes.push(sample.label.clone());
            }
        }
        classes
    }

    /// Per-class row counts, in [`classes`](Self::classes) order
    #[must_use]
    pub fn class_counts(&self) -> Vec<(String, usize)> {
        self.classes()
            .into_iter()
            .map(|class| {
                let count = self.samples.iter().filter(|s| s.label == class).count();
                (class, count)
            })
            .collect()
    }

    /// Encode labels as indices into `classes`
    ///
    /// Labels missing from `classes` are encoded as `classes.len()`, which no
    /// fitted model will ever predict.
    #[must_use]
    pub fn encode_labels(&self, classes: &[String]) -> Vec<usize> {
        self.samples
            .iter()
            .map(|s| {
                classes
                    .iter()
                    .position(|c| *c == s.label)
                    .unwrap_or(classes.len())
            })
            .collect()
    }

    /// Feature matrix for the given rows (`indices.len() x NUM_FEATURES`)
    #[must_use]
    pub fn records(&self, indices: &[usize]) -> Array2<f64> {
        Array2::from_shape_fn((indices.len(), NUM_FEATURES), |(row, col)| {
            self.samples[indices[row]].features[col]
        })
    }

    /// Encoded targets for the given rows
    #[must_use]
    pub fn targets(&self, indices: &[usize], classes: &[String]) -> Array1<usize> {
        let encoded = self.encode_labels(classes);
        indices.iter().map(|&i| encoded[i]).collect()
    }
}

impl FromIterator<Sample> for Dataset {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
