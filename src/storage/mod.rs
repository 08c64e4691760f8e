//! Dataset loading (CSV and Arrow/Parquet)
//!
//! Two input formats, both located by column name:
//! - CSV with a header row (extra columns are ignored)
//! - Parquet files read through Arrow record batches
//!
//! A path that does not resolve is reported as [`Error::DataNotFound`] so the
//! run orchestrator can abort cleanly; every other failure is fatal.

use std::fs::File;
use std::io;
use std::path::Path;

use arrow::array::{Array, Float64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use serde::Deserialize;
use tracing::debug;

use crate::dataset::{Dataset, Sample, FEATURE_NAMES, LABEL_COLUMN, NUM_FEATURES};
use crate::{Error, Result};

/// Load a dataset, choosing the reader from the file extension
///
/// `.parquet` / `.pq` go through Arrow; anything else is read as CSV.
///
/// # Errors
/// - [`Error::DataNotFound`] if `path` does not exist
/// - [`Error::MalformedData`] if a required column is missing or a value is unusable
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let is_parquet = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));

    let dataset = if is_parquet {
        StorageEngine::load_parquet(path)?.to_dataset()?
    } else {
        load_csv(path)?
    };

    debug!(path = %path.display(), rows = dataset.len(), "dataset loaded");
    Ok(dataset)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::DataNotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })
}

/// CSV row, matched to columns by header name
#[derive(Debug, Deserialize)]
struct CsvRow {
    sepal_length: f64,
    sepal_width: f64,
    petal_length: f64,
    petal_width: f64,
    species: String,
}

impl From<CsvRow> for Sample {
    fn from(row: CsvRow) -> Self {
        Self::new(
            [
                row.sepal_length,
                row.sepal_width,
                row.petal_length,
                row.petal_width,
            ],
            row.species,
        )
    }
}

/// Load a dataset from a CSV file with a header row
///
/// # Errors
/// - [`Error::DataNotFound`] if `path` does not exist
/// - [`Error::MalformedData`] if a row is missing a column or holds a non-numeric feature
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let file = open(path.as_ref())?;
    read_csv(file)
}

/// Read a CSV dataset from any reader
///
/// # Errors
/// Returns [`Error::MalformedData`] on the first row that cannot be decoded
pub fn read_csv<R: io::Read>(reader: R) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();
    for (i, row) in rdr.deserialize::<CsvRow>().enumerate() {
        // Header is line 1
        let row = row.map_err(|e| Error::MalformedData(format!("CSV row {}: {e}", i + 2)))?;
        samples.push(Sample::from(row));
    }

    Ok(Dataset::new(samples))
}

/// Storage engine for Arrow/Parquet data
pub struct StorageEngine {
    batches: Vec<RecordBatch>,
}

impl StorageEngine {
    /// Wrap record batches already in memory
    #[must_use]
    pub fn new(batches: Vec<RecordBatch>) -> Self {
        Self { batches }
    }

    /// Load table from Parquet file
    ///
    /// # Errors
    /// Returns error if file cannot be found, read or parsed
    pub fn load_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

        let file = open(path.as_ref())?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

        let mut batches = Vec::new();
        for batch in reader {
            batches.push(batch?);
        }

        Ok(Self { batches })
    }

    /// Total rows across all batches
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// Materialize the batches as a row-oriented [`Dataset`]
    ///
    /// Feature columns may be any numeric type (cast to `Float64`); the label
    /// column may be any type castable to `Utf8`.
    ///
    /// # Errors
    /// Returns [`Error::MalformedData`] if a column is missing, not castable, or holds nulls
    pub fn to_dataset(&self) -> Result<Dataset> {
        let mut samples = Vec::with_capacity(self.num_rows());

        for batch in &self.batches {
            let mut features: Vec<Float64Array> = Vec::with_capacity(NUM_FEATURES);
            for name in FEATURE_NAMES {
                let column = cast_column(batch, name, &DataType::Float64)?;
                let values = column
                    .as_any()
                    .downcast_ref::<Float64Array>()
                    .ok_or_else(|| {
                        Error::MalformedData(format!("column '{name}' is not numeric"))
                    })?
                    .clone();
                features.push(values);
            }

            let labels = cast_column(batch, LABEL_COLUMN, &DataType::Utf8)?;
            let labels = labels
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| {
                    Error::MalformedData(format!("column '{LABEL_COLUMN}' is not text"))
                })?;

            for row in 0..batch.num_rows() {
                let mut values = [0.0; NUM_FEATURES];
                for (slot, column) in values.iter_mut().zip(&features) {
                    *slot = column.value(row);
                }
                samples.push(Sample::new(values, labels.value(row)));
            }
        }

        Ok(Dataset::new(samples))
    }
}

fn cast_column(batch: &RecordBatch, name: &str, to: &DataType) -> Result<arrow::array::ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| Error::MalformedData(format!("missing column '{name}'")))?;

    // Unconvertible values become nulls under the default (safe) cast options
    let column = arrow::compute::cast(batch.column(idx), to)?;
    if column.null_count() > 0 {
        return Err(Error::MalformedData(format!(
            "column '{name}' has {} null or unconvertible values",
            column.null_count()
        )));
    }
    Ok(column)
}
