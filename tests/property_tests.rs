//! Property-based tests for labelflip
//!
//! - Poisoning touches exactly floor(n * r) rows, and every touched row changes
//! - Stratified splits partition the rows and keep class proportions
//! - Accuracy is a fraction of matching positions
//! - Run with ProptestConfig::with_cases(100)

use labelflip::dataset::{Dataset, Sample};
use labelflip::poison::poison_labels;
use labelflip::split::stratified_split;
use labelflip::train::Evaluation;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

/// Dataset of 2..=4 classes with 2..=30 rows each, in shuffled order
fn arb_dataset() -> impl Strategy<Value = Dataset> {
    proptest::collection::vec(2usize..=30, 2..=4)
        .prop_flat_map(|sizes| {
            let labels: Vec<usize> = sizes
                .iter()
                .enumerate()
                .flat_map(|(class, &n)| std::iter::repeat(class).take(n))
                .collect();
            Just(labels).prop_shuffle()
        })
        .prop_map(|labels| {
            labels
                .into_iter()
                .enumerate()
                .map(|(i, class)| Sample::new([i as f64, 0.0, 0.0, 0.0], format!("class-{class}")))
                .collect::<Dataset>()
        })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: exactly floor(n * r) rows change, and each changed row gets another label
    #[test]
    fn prop_poison_flips_exact_count(
        data in arb_dataset(),
        rate in 0.0f64..=1.0,
        select_seed in any::<u64>(),
        replace_seed in any::<u64>()
    ) {
        let original = data.clone();
        let mut data = data;
        let report = poison_labels(
            &mut data,
            rate,
            &mut StdRng::seed_from_u64(select_seed),
            &mut StdRng::seed_from_u64(replace_seed),
        ).unwrap();

        let expected = (original.len() as f64 * rate).floor() as usize;
        prop_assert_eq!(report.poisoned(), expected);

        let changed = (0..data.len()).filter(|&i| data.label(i) != original.label(i)).count();
        prop_assert_eq!(changed, expected);

        let classes = original.classes();
        for &row in report.indices() {
            let label = data.label(row).unwrap().to_string();
            prop_assert!(classes.contains(&label));
        }
    }

    /// Property: features are never touched by poisoning
    #[test]
    fn prop_poison_preserves_features(data in arb_dataset(), rate in 0.0f64..=1.0) {
        let original = data.clone();
        let mut data = data;
        poison_labels(
            &mut data,
            rate,
            &mut StdRng::seed_from_u64(42),
            &mut StdRng::seed_from_u64(7),
        ).unwrap();

        for (a, b) in data.samples().iter().zip(original.samples()) {
            prop_assert_eq!(a.features, b.features);
        }
    }

    /// Property: train and test are disjoint and cover every row once
    #[test]
    fn prop_split_partitions_rows(data in arb_dataset(), seed in any::<u64>()) {
        let labels = data.labels();
        if let Ok(split) = stratified_split(&labels, 0.4, seed) {
            let mut all: Vec<usize> = split.train().iter().chain(split.test()).copied().collect();
            all.sort_unstable();
            let expected: Vec<usize> = (0..labels.len()).collect();
            prop_assert_eq!(all, expected);
        }
    }

    /// Property: each class lands in test within one row of its exact share
    #[test]
    fn prop_split_keeps_class_proportions(data in arb_dataset(), seed in any::<u64>()) {
        let labels = data.labels();
        if let Ok(split) = stratified_split(&labels, 0.4, seed) {
            let n = labels.len() as f64;
            let n_test = split.test().len() as f64;
            for (class, count) in data.class_counts() {
                let in_test = split.test().iter().filter(|&&i| labels[i] == class).count() as f64;
                let exact = count as f64 * n_test / n;
                prop_assert!((in_test - exact).abs() < 1.0, "class {class}: {in_test} vs {exact}");
            }
        }
    }

    /// Property: accuracy is within [0, 1] and equals the matching fraction
    #[test]
    fn prop_accuracy_is_matching_fraction(
        pairs in proptest::collection::vec((0u8..3, 0u8..3), 1..200)
    ) {
        let (predicted, truth): (Vec<u8>, Vec<u8>) = pairs.into_iter().unzip();
        let eval = Evaluation::from_predictions(&predicted, &truth).unwrap();
        let matching = predicted.iter().zip(&truth).filter(|(p, t)| p == t).count();

        prop_assert!((0.0..=1.0).contains(&eval.accuracy()));
        prop_assert!((eval.accuracy() - matching as f64 / truth.len() as f64).abs() < 1e-12);
    }
}
