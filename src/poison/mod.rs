//! Label poisoning by random label flipping
//!
//! Two random sources are involved and they are deliberately separate:
//!
//! - **Selection** picks which rows get poisoned. It is seeded, so the same
//!   seed and rate always poison the same rows.
//! - **Replacement** picks the new label for each selected row, uniformly from
//!   the classes other than the row's current one. It is unseeded in normal
//!   runs, so the flipped values vary between runs over a fixed row set.
//!
//! Both are plain [`rand::Rng`] parameters of [`poison_labels`], so tests can
//! pin either draw independently.
//!
//! ## Example
//!
//! ```rust
//! use labelflip::dataset::{Dataset, Sample};
//! use labelflip::poison::{PoisonConfig, Poisoner};
//!
//! let mut data: Dataset = (0..30)
//!     .map(|i| Sample::new([f64::from(i); 4], ["a", "b", "c"][i as usize % 3]))
//!     .collect();
//!
//! let report = Poisoner::new(PoisonConfig::new(0.2)).poison(&mut data)?;
//! assert_eq!(report.poisoned(), 6);
//! # Ok::<(), labelflip::Error>(())
//! ```

use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::{Error, Result};

/// Default seed for row selection
pub const DEFAULT_POISON_SEED: u64 = 42;

/// Poisoning parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoisonConfig {
    rate: f64,
    seed: u64,
}

impl PoisonConfig {
    /// Poison `rate` of the rows, selected with the default seed
    #[must_use]
    pub const fn new(rate: f64) -> Self {
        Self {
            rate,
            seed: DEFAULT_POISON_SEED,
        }
    }

    /// Override the row-selection seed
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fraction of rows to poison
    #[must_use]
    pub const fn rate(&self) -> f64 {
        self.rate
    }

    /// Row-selection seed
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for PoisonConfig {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Outcome of a poisoning pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PoisonReport {
    indices: Vec<usize>,
}

impl PoisonReport {
    /// Number of rows whose label was changed
    #[must_use]
    pub fn poisoned(&self) -> usize {
        self.indices.len()
    }

    /// Row indices that were changed, in the order they were poisoned
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// True when nothing was poisoned
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Number of rows a rate selects from `len` rows: `floor(len * rate)`
///
/// # Errors
/// Returns [`Error::InvalidInput`] if `rate` is not finite or the count falls
/// outside `0..=len`.
pub fn poison_count(len: usize, rate: f64) -> Result<usize> {
    #[allow(clippy::cast_precision_loss)]
    let wanted = (len as f64 * rate).floor();
    if !wanted.is_finite() || wanted < 0.0 {
        return Err(Error::InvalidInput(format!(
            "poison rate {rate} yields no valid sample size for {len} rows"
        )));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = wanted as usize;
    if count > len {
        return Err(Error::InvalidInput(format!(
            "cannot poison {count} rows of a {len}-row dataset (rate {rate})"
        )));
    }
    Ok(count)
}

/// Flip the labels of `floor(n * rate)` rows in place
///
/// Rows are chosen without replacement using `select_rng`. Each chosen row gets
/// a label drawn uniformly from the dataset's other classes using
/// `replace_rng`. A rate of exactly zero is a no-op that draws from neither
/// source.
///
/// The rate itself is not range-checked here; a rate whose sample size cannot
/// be drawn is reported as an error instead.
///
/// # Errors
/// - [`Error::InvalidInput`] if the sample size is out of range
/// - [`Error::InvalidInput`] if rows must be flipped but the dataset has fewer than two classes
pub fn poison_labels<S, R>(
    dataset: &mut Dataset,
    rate: f64,
    select_rng: &mut S,
    replace_rng: &mut R,
) -> Result<PoisonReport>
where
    S: Rng + ?Sized,
    R: Rng + ?Sized,
{
    if rate == 0.0 {
        info!("No poisoning applied.");
        return Ok(PoisonReport::default());
    }

    let count = poison_count(dataset.len(), rate)?;
    let classes = dataset.classes();
    if count > 0 && classes.len() < 2 {
        return Err(Error::InvalidInput(format!(
            "cannot flip labels: dataset has {} distinct class(es)",
            classes.len()
        )));
    }

    let selected = index::sample(select_rng, dataset.len(), count).into_vec();
    for &row in &selected {
        let current = dataset.label(row).unwrap_or_default().to_string();
        let alternatives: Vec<&String> = classes.iter().filter(|c| **c != current).collect();
        if let Some(&new_label) = alternatives.choose(replace_rng) {
            debug!(row, from = %current, to = %new_label, "label flipped");
            dataset.set_label(row, new_label.clone());
        }
    }

    info!(
        poisoned = selected.len(),
        rate_pct = rate * 100.0,
        "Poisoned {} rows ({}%) with label flipping",
        selected.len(),
        rate * 100.0
    );

    Ok(PoisonReport { indices: selected })
}

/// Poisoner bound to a [`PoisonConfig`]
///
/// Selection uses a `StdRng` seeded from the config; replacement uses OS
/// entropy unless [`poison_with`](Self::poison_with) supplies a source.
#[derive(Debug, Clone, Copy, Default)]
pub struct Poisoner {
    config: PoisonConfig,
}

impl Poisoner {
    /// Create a poisoner
    #[must_use]
    pub const fn new(config: PoisonConfig) -> Self {
        Self { config }
    }

    /// Poisoning parameters
    #[must_use]
    pub const fn config(&self) -> &PoisonConfig {
        &self.config
    }

    /// Poison with a fresh entropy-seeded replacement source
    ///
    /// # Errors
    /// See [`poison_labels`]
    pub fn poison(&self, dataset: &mut Dataset) -> Result<PoisonReport> {
        let mut replace_rng = StdRng::from_entropy();
        self.poison_with(dataset, &mut replace_rng)
    }

    /// Poison with a caller-supplied replacement source
    ///
    /// # Errors
    /// See [`poison_labels`]
    pub fn poison_with<R: Rng + ?Sized>(
        &self,
        dataset: &mut Dataset,
        replace_rng: &mut R,
    ) -> Result<PoisonReport> {
        let mut select_rng = StdRng::seed_from_u64(self.config.seed);
        poison_labels(dataset, self.config.rate, &mut select_rng, replace_rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Sample;

    fn balanced(per_class: usize, classes: &[&str]) -> Dataset {
        classes
            .iter()
            .flat_map(|c| (0..per_class).map(move |i| Sample::new([i as f64; 4], *c)))
            .collect()
    }

    #[test]
    fn test_zero_rate_is_noop() {
        let mut data = balanced(10, &["a", "b", "c"]);
        let before = data.clone();
        let report = Poisoner::new(PoisonConfig::new(0.0)).poison(&mut data).unwrap();
        assert!(report.is_empty());
        assert_eq!(data, before);
    }

    #[test]
    fn test_poison_count_floor() {
        assert_eq!(poison_count(150, 0.1).unwrap(), 15);
        assert_eq!(poison_count(10, 0.25).unwrap(), 2);
        assert_eq!(poison_count(7, 1.0).unwrap(), 7);
    }

    #[test]
    fn test_poison_count_out_of_range() {
        assert!(matches!(poison_count(10, 1.5), Err(Error::InvalidInput(_))));
        assert!(matches!(poison_count(10, -0.5), Err(Error::InvalidInput(_))));
        assert!(matches!(poison_count(10, f64::NAN), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_same_seed_same_rows() {
        let poisoner = Poisoner::new(PoisonConfig::new(0.3).with_seed(7));
        assert_eq!(poisoner.config().seed(), 7);
        let mut a = balanced(20, &["a", "b", "c"]);
        let mut b = balanced(20, &["a", "b", "c"]);
        let ra = poisoner.poison(&mut a).unwrap();
        let rb = poisoner.poison(&mut b).unwrap();
        assert_eq!(ra.indices(), rb.indices());
    }

    #[test]
    fn test_two_classes_flip_deterministically() {
        let mut data = balanced(10, &["pos", "neg"]);
        let before = data.clone();
        let report = Poisoner::new(PoisonConfig::new(0.5)).poison(&mut data).unwrap();
        assert_eq!(report.poisoned(), 10);
        for &row in report.indices() {
            let expected = if before.label(row) == Some("pos") { "neg" } else { "pos" };
            assert_eq!(data.label(row), Some(expected));
        }
    }

    #[test]
    fn test_single_class_rejected() {
        let mut data = balanced(5, &["only"]);
        let err = Poisoner::new(PoisonConfig::new(0.4)).poison(&mut data).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_small_rate_rounds_to_zero_rows() {
        let mut data = balanced(3, &["a", "b", "c"]);
        let before = data.clone();
        let report = Poisoner::new(PoisonConfig::new(0.05)).poison(&mut data).unwrap();
        assert_eq!(report.poisoned(), 0);
        assert_eq!(data, before);
    }
}
