use linfa::{
    prelude::AsTargets as _,
    traits::{Fit, Predict as _},
};
use linfa_pls::PlsRegression;
use ndarray::Array2;
use tracing::{debug, error};

use crate::{
    data::{normalize::NormalizationReference, split::SequenceSet},
    error::HelioError,
};

/// Evaluation of the baseline on one set, in both normalized and physical units.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineEval {
    pub examples: usize,
    pub mse: f64,
    pub rmse_physical: f64,
}

impl std::fmt::Display for BaselineEval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} examples, mse {:.6} (normalized), rmse {:.2} (physical units)",
            self.examples, self.mse, self.rmse_physical
        )
    }
}

/// Fits an off-the-shelf PLS regression on the flattened training windows.
///
/// This is the stand-in training collaborator: the prepared sets are consumed
/// exactly as a sequence-model library would consume them, with the sequence
/// axis flattened to features.
pub fn fit(train: &SequenceSet, n_components: usize) -> Result<PlsRegression<f64>, HelioError> {
    let n_samples = train.len()?;
    let shape = train.inputs.shape();
    let n_features = shape[1] * shape[2];

    if n_samples == 0 {
        return Err(HelioError::InsufficientData {
            got: 0,
            required: 1,
            context: "No training examples for baseline fitting".to_string(),
        });
    }
    if n_components == 0 {
        return Err(HelioError::ConfigError(
            "Number of PLS components must be greater than 0".to_string(),
        ));
    }
    let max_components = n_samples.min(n_features);
    if n_components > max_components {
        return Err(HelioError::ConfigError(format!(
            "Number of PLS components ({}) cannot exceed min(samples, features) ({})",
            n_components, max_components
        )));
    }

    let features = flatten_inputs(train)?;
    if features.iter().any(|&x| !x.is_finite()) {
        error!("Non-finite value detected in baseline features before fit.");
        return Err(HelioError::NonFiniteValue {
            column: "baseline_features".to_string(),
            row: 0,
        });
    }
    let targets = Array2::from_shape_vec((n_samples, 1), train.targets.to_vec())?;
    if targets.iter().any(|&x| !x.is_finite()) {
        error!("Non-finite value detected in baseline targets before fit.");
        return Err(HelioError::NonFiniteValue {
            column: "baseline_targets".to_string(),
            row: 0,
        });
    }

    let dataset = linfa::dataset::Dataset::new(features, targets);

    debug!(
        "Fitting baseline PLS with {} components, {} samples, {} features",
        n_components, n_samples, n_features
    );

    PlsRegression::params(n_components)
        .fit(&dataset)
        .map_err(HelioError::FitError)
}

/// Predicts targets for a prepared set.
pub fn predict(pls: &PlsRegression<f64>, set: &SequenceSet) -> Result<Vec<f64>, HelioError> {
    if set.is_empty() {
        return Ok(Vec::new());
    }
    let features = flatten_inputs(set)?;
    let y_hat = pls.predict(&features).as_targets().to_owned();
    Ok(y_hat.into_raw_vec())
}

/// Predicts on a set and reports MSE in normalized units plus RMSE after
/// inverting the cumulative-total scaling.
pub fn evaluate(
    pls: &PlsRegression<f64>,
    set: &SequenceSet,
    reference: &NormalizationReference,
) -> Result<BaselineEval, HelioError> {
    let n = set.len()?;
    if n == 0 {
        return Ok(BaselineEval {
            examples: 0,
            mse: 0.0,
            rmse_physical: 0.0,
        });
    }
    let predictions = predict(pls, set)?;
    let mse = predictions
        .iter()
        .zip(set.targets.iter())
        .map(|(p, t)| (p - t) * (p - t))
        .sum::<f64>()
        / n as f64;
    let mse_physical = predictions
        .iter()
        .zip(set.targets.iter())
        .map(|(p, t)| {
            let diff =
                reference.cumulative.denormalize(*p) - reference.cumulative.denormalize(*t);
            diff * diff
        })
        .sum::<f64>()
        / n as f64;
    Ok(BaselineEval {
        examples: n,
        mse,
        rmse_physical: mse_physical.sqrt(),
    })
}

fn flatten_inputs(set: &SequenceSet) -> Result<Array2<f64>, HelioError> {
    let shape = set.inputs.shape();
    let (n, features) = (shape[0], shape[1] * shape[2]);
    Ok(set.inputs.to_owned().into_shape((n, features))?)
}
