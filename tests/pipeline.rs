use helio::{
    config::HelioConfig,
    data::{dataset::Dataset, normalize::NormalizationReference, reading::read_csv, split::Split},
    error::HelioError,
};
use tempfile::TempDir;

mod common;

use common::{fixture_config, ramp};

#[test]
fn test_known_day_scenario() {
    // One day of 8 cumulative readings, max 1815.0, normalized against
    // dataset-wide bounds.
    let day = vec![1.69, 11.36, 67.50, 250.50, 573.50, 900.0, 1200.0, 1815.0];
    let dir = TempDir::new().unwrap();
    let config = fixture_config(&dir, &[day.clone()], false);

    let prepared = Dataset::prepare_examples(&config).unwrap();

    // The single day gets id 0, which routes to the test set
    assert!(prepared.train.is_empty());
    assert!(prepared.validation.is_empty());
    assert_eq!(prepared.test.len(), 7);

    let norm = |x: f64| prepared.reference.cumulative.normalize(x);

    // Every example of the day shares the day's normalized maximum as target
    for example in &prepared.test {
        assert!((example.target - norm(1815.0)).abs() < 1e-12);
        assert_eq!(example.input.len(), 14);
    }

    // The prefix-length-3 example: three normalized values then zeros
    let example = &prepared.test[1];
    assert!((example.input[0] - norm(1.69)).abs() < 1e-12);
    assert!((example.input[1] - norm(11.36)).abs() < 1e-12);
    assert!((example.input[2] - norm(67.50)).abs() < 1e-12);
    assert!(example.input[3..].iter().all(|&v| v == 0.0));
}

#[test]
fn test_filter_truncate_and_split_end_to_end() {
    // Day layout: index 2 is too short to survive, index 3 is truncated.
    let mut days = Vec::new();
    days.push(ramp(8, 1000.0)); // survivor id 0 -> test
    days.push(ramp(9, 1100.0)); // id 1 -> train
    days.push(ramp(7, 1200.0)); // dropped
    days.push(ramp(20, 1300.0)); // truncated to 14, id 2 -> train
    for d in 0..10 {
        days.push(ramp(10 + d % 5, 1400.0 + d as f64 * 10.0)); // ids 3..=12
    }
    let dir = TempDir::new().unwrap();
    let config = fixture_config(&dir, &days, false);

    let prepared = Dataset::prepare_examples(&config).unwrap();

    // Survivor sizes after truncation, in encounter order
    let sizes = [8, 9, 14, 10, 11, 12, 13, 14, 10, 11, 12, 13, 14];
    let expected_total: usize = sizes.iter().map(|n| n - 1).sum();
    let total = prepared.train.len() + prepared.validation.len() + prepared.test.len();
    assert_eq!(total, expected_total);

    // Ids route on the decade cycle: {0, 10} -> test, {9} -> validation
    let test_ids: Vec<usize> = {
        let mut ids: Vec<usize> = prepared.test.iter().map(|e| e.day_id).collect();
        ids.dedup();
        ids
    };
    assert_eq!(test_ids, vec![0, 10]);
    let validation_ids: Vec<usize> = {
        let mut ids: Vec<usize> = prepared.validation.iter().map(|e| e.day_id).collect();
        ids.dedup();
        ids
    };
    assert_eq!(validation_ids, vec![9]);

    // The dropped day's date never appears in any split
    let dropped_date = common::base_date() + chrono::Days::new(2);
    for example in prepared
        .train
        .iter()
        .chain(&prepared.validation)
        .chain(&prepared.test)
    {
        assert_ne!(example.date, dropped_date);
    }

    // The truncated day contributes exactly 13 examples
    let truncated_date = common::base_date() + chrono::Days::new(3);
    let truncated_count = prepared
        .train
        .iter()
        .filter(|e| e.date == truncated_date)
        .count();
    assert_eq!(truncated_count, 13);

    // Tensor assembly keeps the fixed (n, 14, 1) shape per split
    let dataset = Dataset::prepare(&config).unwrap();
    let shape = dataset.shape();
    assert_eq!(shape[&Split::Train].1, 14);
    assert_eq!(shape[&Split::Train].2, 1);
    assert_eq!(
        shape[&Split::Train].0 + shape[&Split::Validation].0 + shape[&Split::Test].0,
        expected_total
    );
}

#[test]
fn test_prepare_is_reproducible_through_cache() {
    let days: Vec<Vec<f64>> = (0..15)
        .map(|d| ramp(8 + d % 7, 900.0 + d as f64 * 25.0))
        .collect();
    let dir = TempDir::new().unwrap();
    let config = fixture_config(&dir, &days, true);

    let first = Dataset::prepare(&config).unwrap();
    // Second run hits the bincode cache and must yield the identical dataset
    let second = Dataset::prepare(&config).unwrap();

    assert_eq!(first.train, second.train);
    assert_eq!(first.validation, second.validation);
    assert_eq!(first.test, second.test);
    assert_eq!(first.reference, second.reference);
}

#[test]
fn test_missing_data_file_reports_source_url() {
    let config = HelioConfig {
        data_path: std::path::PathBuf::from("/nonexistent/solar.csv"),
        cache_enabled: false,
        ..Default::default()
    };
    let result = Dataset::prepare(&config);
    match result {
        Err(HelioError::DataFileMissing { url, .. }) => {
            assert_eq!(url, config.data_url);
        }
        other => panic!("Expected DataFileMissing, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_all_days_filtered_is_an_error() {
    let days = vec![ramp(3, 100.0), ramp(4, 200.0)];
    let dir = TempDir::new().unwrap();
    let config = fixture_config(&dir, &days, false);
    let result = Dataset::prepare_examples(&config);
    assert!(matches!(result, Err(HelioError::InsufficientData { .. })));
}

#[test]
fn test_reference_spans_whole_dataset() {
    let days = vec![ramp(8, 500.0), ramp(8, 2000.0)];
    let dir = TempDir::new().unwrap();
    let config = fixture_config(&dir, &days, false);

    let readings = read_csv(&config.data_path).unwrap();
    let reference = NormalizationReference::fit(&readings).unwrap();
    // Bounds come from the full ingested dataset, not any single day
    assert_eq!(reference.cumulative.max(), 2000.0);
    assert_eq!(reference.cumulative.min(), 500.0 / 8.0);

    let prepared = Dataset::prepare_examples(&config).unwrap();
    assert_eq!(prepared.reference, reference);
}
