//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use labelflip::dataset::{Dataset, Sample, FEATURE_NAMES, LABEL_COLUMN};

/// Species names, in class order
pub const SPECIES: [&str; 3] = ["setosa", "versicolor", "virginica"];

/// 150 rows, 50 per species, separable along the petal features only
pub fn iris_like() -> Dataset {
    balanced(50)
}

/// `per_class` rows of each species
pub fn balanced(per_class: usize) -> Dataset {
    let mut samples = Vec::with_capacity(per_class * SPECIES.len());
    for (k, species) in SPECIES.iter().enumerate() {
        for i in 0..per_class {
            let jitter = ((i * 37 + k * 11) % 50) as f64 / 50.0;
            let k = k as f64;
            samples.push(Sample::new(
                [
                    5.0 + jitter * 2.0,
                    2.8 + (1.0 - jitter) * 0.8,
                    1.4 + k * 2.2 + jitter * 1.2,
                    0.2 + k * 0.9 + jitter * 0.5,
                ],
                *species,
            ));
        }
    }
    Dataset::new(samples)
}

/// Render a dataset as CSV with a header row
pub fn to_csv(dataset: &Dataset) -> String {
    let mut out = format!("{},{LABEL_COLUMN}\n", FEATURE_NAMES.join(","));
    for s in dataset.samples() {
        let f = s.features;
        writeln!(out, "{},{},{},{},{}", f[0], f[1], f[2], f[3], s.label).unwrap();
    }
    out
}

/// Write a dataset as `iris.csv` under `dir`
pub fn write_csv(dir: &Path, dataset: &Dataset) -> PathBuf {
    let path = dir.join("iris.csv");
    std::fs::write(&path, to_csv(dataset)).unwrap();
    path
}
