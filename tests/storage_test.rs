//! Dataset loading from CSV and Parquet files

mod common;

use std::fs::File;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use labelflip::storage::{load_csv, load_dataset, StorageEngine};
use labelflip::Error;
use parquet::arrow::ArrowWriter;

fn write_parquet(path: &std::path::Path, batch: &RecordBatch) {
    let file = File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
    writer.write(batch).unwrap();
    writer.close().unwrap();
}

fn iris_batch(labels: ArrayRef, label_type: DataType) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("sepal_length", DataType::Float64, false),
        Field::new("sepal_width", DataType::Float64, false),
        Field::new("petal_length", DataType::Float64, false),
        Field::new("petal_width", DataType::Float32, false),
        Field::new("species", label_type, true),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Float64Array::from(vec![5.1, 7.0, 6.3])),
            Arc::new(Float64Array::from(vec![3.5, 3.2, 3.3])),
            Arc::new(Float64Array::from(vec![1.4, 4.7, 6.0])),
            Arc::new(Float32Array::from(vec![0.25, 1.5, 2.5])),
            labels,
        ],
    )
    .unwrap()
}

#[test]
fn test_csv_file_round_trips_fixture() {
    let tmp = tempfile::tempdir().unwrap();
    let original = common::iris_like();
    let path = common::write_csv(tmp.path(), &original);

    let loaded = load_dataset(&path).unwrap();

    assert_eq!(loaded, original);
    assert_eq!(loaded.class_counts().len(), 3);
}

#[test]
fn test_csv_missing_file_is_data_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nope.csv");
    match load_csv(&path) {
        Err(Error::DataNotFound(p)) => assert_eq!(p, path),
        other => panic!("expected DataNotFound, got {other:?}"),
    }
}

#[test]
fn test_parquet_string_labels() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("iris.parquet");
    let labels: ArrayRef = Arc::new(StringArray::from(vec!["setosa", "versicolor", "virginica"]));
    write_parquet(&path, &iris_batch(labels, DataType::Utf8));

    let data = load_dataset(&path).unwrap();

    assert_eq!(data.len(), 3);
    assert_eq!(data.labels(), vec!["setosa", "versicolor", "virginica"]);
    assert!((data.samples()[0].features[3] - 0.25).abs() < 1e-6);
}

#[test]
fn test_parquet_integer_labels_cast_to_text() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("iris.parquet");
    let labels: ArrayRef = Arc::new(Int64Array::from(vec![0, 1, 2]));
    write_parquet(&path, &iris_batch(labels, DataType::Int64));

    let data = load_dataset(&path).unwrap();

    assert_eq!(data.classes(), vec!["0", "1", "2"]);
}

#[test]
fn test_null_label_is_malformed() {
    let labels: ArrayRef = Arc::new(StringArray::from(vec![Some("setosa"), None, Some("virginica")]));
    let engine = StorageEngine::new(vec![iris_batch(labels, DataType::Utf8)]);

    let err = engine.to_dataset().unwrap_err();

    assert!(matches!(err, Error::MalformedData(_)));
    assert!(err.to_string().contains("species"));
}

#[test]
fn test_missing_column_is_malformed() {
    let schema = Arc::new(Schema::new(vec![Field::new("sepal_length", DataType::Float64, false)]));
    let batch =
        RecordBatch::try_new(schema, vec![Arc::new(Float64Array::from(vec![5.1]))]).unwrap();

    let err = StorageEngine::new(vec![batch]).to_dataset().unwrap_err();

    assert!(err.to_string().contains("missing column 'sepal_width'"));
}

#[test]
fn test_parquet_missing_file_is_data_not_found() {
    let err = StorageEngine::load_parquet("/no/such/dir/iris.parquet").err().unwrap();
    assert!(matches!(err, Error::DataNotFound(_)));
}
