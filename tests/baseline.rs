use helio::{
    data::dataset::Dataset,
    model::pls::{evaluate, fit, predict},
};
use tempfile::TempDir;

mod common;

use common::{fixture_config, ramp};

fn prepared_dataset(dir: &TempDir) -> Dataset {
    let days: Vec<Vec<f64>> = (0..24)
        .map(|d| ramp(8 + d % 7, 1000.0 + d as f64 * 40.0))
        .collect();
    let config = fixture_config(dir, &days, false);
    Dataset::prepare(&config).unwrap()
}

#[test]
fn test_baseline_consumes_prepared_sets() {
    let dir = TempDir::new().unwrap();
    let dataset = prepared_dataset(&dir);

    let pls = fit(&dataset.train, 3).unwrap();

    let predictions = predict(&pls, &dataset.validation).unwrap();
    assert_eq!(predictions.len(), dataset.validation.len().unwrap());
    assert!(predictions.iter().all(|p| p.is_finite()));
}

#[test]
fn test_baseline_evaluation_is_finite_on_all_splits() {
    let dir = TempDir::new().unwrap();
    let dataset = prepared_dataset(&dir);

    let pls = fit(&dataset.train, 3).unwrap();
    for set in [&dataset.train, &dataset.validation, &dataset.test] {
        let eval = evaluate(&pls, set, &dataset.reference).unwrap();
        assert_eq!(eval.examples, set.len().unwrap());
        assert!(eval.mse.is_finite() && eval.mse >= 0.0);
        assert!(eval.rmse_physical.is_finite() && eval.rmse_physical >= 0.0);
    }
}

#[test]
fn test_baseline_learns_the_ramp_targets() {
    // Targets are the per-day maxima of monotone ramps; with the full prefix
    // present in the features, PLS should track them far better than chance.
    let dir = TempDir::new().unwrap();
    let dataset = prepared_dataset(&dir);

    let pls = fit(&dataset.train, 3).unwrap();
    let eval = evaluate(&pls, &dataset.train, &dataset.reference).unwrap();
    // Normalized targets lie in [0, 1]; a fit that failed to pick up the ramp
    // structure at all would land far beyond this bound.
    assert!(eval.mse < 0.05, "train mse unexpectedly high: {}", eval.mse);
}
