use chrono::NaiveDate;
use ndarray::{Array1, Array3};
use tracing::debug;

use crate::{config::HelioConfig, data::window::WindowedExample, error::HelioError};

/// Destination set of one day's examples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Validation,
    Test,
}

/// The deterministic decade-cycle partition: `day_id mod modulus` routes a
/// whole day to one set. No randomness, no shuffling; temporally adjacent
/// days land in different sets on a fixed repeating pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitRule {
    pub modulus: usize,
    pub test_remainder: usize,
    pub validation_remainder: usize,
}

impl SplitRule {
    pub fn from_config(config: &HelioConfig) -> Self {
        Self {
            modulus: config.split_modulus,
            test_remainder: config.test_remainder,
            validation_remainder: config.validation_remainder,
        }
    }

    pub fn route(&self, day_id: usize) -> Split {
        let remainder = day_id % self.modulus;
        if remainder == self.test_remainder {
            Split::Test
        } else if remainder == self.validation_remainder {
            Split::Validation
        } else {
            Split::Train
        }
    }
}

impl Default for SplitRule {
    fn default() -> Self {
        Self {
            modulus: 10,
            test_remainder: 0,
            validation_remainder: 9,
        }
    }
}

/// One prepared set: inputs of fixed shape `(n, sequence_length, 1)`, one
/// scalar target per example, and the source date of each example, all in
/// emission order.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceSet {
    pub inputs: Array3<f64>,
    pub targets: Array1<f64>,
    pub dates: Vec<NaiveDate>,
}

impl SequenceSet {
    pub fn from_examples(
        examples: &[WindowedExample],
        sequence_length: usize,
    ) -> Result<Self, HelioError> {
        let n = examples.len();
        let mut flat = Vec::with_capacity(n * sequence_length);
        for example in examples {
            flat.extend_from_slice(&example.input);
        }
        let inputs = Array3::from_shape_vec((n, sequence_length, 1), flat)?;
        let targets = Array1::from_iter(examples.iter().map(|e| e.target));
        let dates = examples.iter().map(|e| e.date).collect();
        Ok(Self {
            inputs,
            targets,
            dates,
        })
    }

    /// Number of examples in the set. Errors if internal lengths diverged.
    pub fn len(&self) -> Result<usize, HelioError> {
        let n = self.inputs.shape()[0];
        if self.targets.len() == n && self.dates.len() == n {
            Ok(n)
        } else {
            Err(HelioError::InvalidSetLengths(
                n,
                self.targets.len(),
                self.dates.len(),
            ))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.shape()[0] == 0
    }
}

/// Routes windowed examples into the three sets by their day id, preserving
/// emission order within each set.
pub fn split_examples(
    examples: Vec<WindowedExample>,
    rule: SplitRule,
) -> (
    Vec<WindowedExample>,
    Vec<WindowedExample>,
    Vec<WindowedExample>,
) {
    let mut train = Vec::new();
    let mut validation = Vec::new();
    let mut test = Vec::new();
    for example in examples {
        match rule.route(example.day_id) {
            Split::Train => train.push(example),
            Split::Validation => validation.push(example),
            Split::Test => test.push(example),
        }
    }
    debug!(
        train = train.len(),
        validation = validation.len(),
        test = test.len(),
        "Routed examples into splits"
    );
    (train, validation, test)
}
