//! Stratified train/test splitting
//!
//! The test side takes `ceil(n * test_fraction)` rows. Each class contributes
//! `floor` or `floor + 1` of its exact proportional share (largest-remainder
//! apportionment), and rows within a class are drawn with a seeded shuffle.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::{Error, Result};

/// Fraction of rows held out for evaluation
pub const DEFAULT_TEST_FRACTION: f64 = 0.4;

/// Default shuffle seed
pub const DEFAULT_SPLIT_SEED: u64 = 42;

/// Disjoint train/test row indices over one dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    train: Vec<usize>,
    test: Vec<usize>,
}

impl Split {
    /// Training row indices, ascending
    #[must_use]
    pub fn train(&self) -> &[usize] {
        &self.train
    }

    /// Held-out row indices, ascending
    #[must_use]
    pub fn test(&self) -> &[usize] {
        &self.test
    }

    /// Total rows covered by both sides
    #[must_use]
    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    /// True when the split covers no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.train.is_empty() && self.test.is_empty()
    }
}

/// Split row indices so every class keeps its proportion on both sides
///
/// # Errors
/// - [`Error::InvalidInput`] if `test_fraction` is not strictly between 0 and 1
/// - [`Error::InsufficientStratificationData`] if `labels` is empty, a class
///   has fewer than two members, or either side is smaller than the number of classes
pub fn stratified_split<L: PartialEq + std::fmt::Debug>(
    labels: &[L],
    test_fraction: f64,
    seed: u64,
) -> Result<Split> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(Error::InvalidInput(format!(
            "test fraction must be in (0, 1), got {test_fraction}"
        )));
    }

    if labels.is_empty() {
        return Err(Error::InsufficientStratificationData(
            "cannot split an empty dataset".to_string(),
        ));
    }

    let groups = group_by_class(labels);
    if let Some((label, members)) = groups.iter().find(|(_, m)| m.len() < 2) {
        return Err(Error::InsufficientStratificationData(format!(
            "the least populated class {label:?} has only {} member(s); \
             every class needs at least 2",
            members.len()
        )));
    }

    let n = labels.len();
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let n_test = (n as f64 * test_fraction).ceil() as usize;
    let n_train = n - n_test;
    if n_test < groups.len() || n_train < groups.len() {
        return Err(Error::InsufficientStratificationData(format!(
            "train size {n_train} and test size {n_test} must each be at least \
             the number of classes ({})",
            groups.len()
        )));
    }

    let counts: Vec<usize> = groups.iter().map(|(_, m)| m.len()).collect();
    let test_counts = apportion(&counts, n_test, n);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n_train);
    let mut test = Vec::with_capacity(n_test);
    for ((label, mut members), take) in groups.into_iter().zip(test_counts) {
        members.shuffle(&mut rng);
        debug!(class = ?label, total = members.len(), test = take, "stratum split");
        test.extend_from_slice(&members[..take]);
        train.extend_from_slice(&members[take..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok(Split { train, test })
}

/// Row indices per distinct label, in order of first appearance
fn group_by_class<L: PartialEq>(labels: &[L]) -> Vec<(&L, Vec<usize>)> {
    let mut groups: Vec<(&L, Vec<usize>)> = Vec::new();
    for (i, label) in labels.iter().enumerate() {
        match groups.iter_mut().find(|(l, _)| *l == label) {
            Some((_, members)) => members.push(i),
            None => groups.push((label, vec![i])),
        }
    }
    groups
}

/// Largest-remainder apportionment of `total` draws over classes of size `counts`
///
/// Extra draws go to classes that would still keep a training row before
/// classes that would be exhausted.
fn apportion(counts: &[usize], total: usize, n: usize) -> Vec<usize> {
    let mut alloc: Vec<usize> = counts.iter().map(|&c| c * total / n).collect();
    let mut leftover = total - alloc.iter().sum::<usize>();

    // Remainder of c * total / n, compared exactly in integers
    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(counts[i] * total % n));

    for keep_one in [true, false] {
        for &i in &order {
            if leftover == 0 {
                break;
            }
            let cap = if keep_one { counts[i] - 1 } else { counts[i] };
            if alloc[i] < cap && alloc[i] == counts[i] * total / n {
                alloc[i] += 1;
                leftover -= 1;
            }
        }
    }
    alloc
}
