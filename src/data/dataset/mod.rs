use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{
    config::HelioConfig,
    data::{
        day_group::group_by_day,
        normalize::NormalizationReference,
        reading::load_readings,
        split::{split_examples, SequenceSet, Split, SplitRule},
        window::{window_groups, WindowedExample},
    },
    error::HelioError,
};

use self::cache::{load_from_cache, save_to_cache};

pub mod cache;

/// The windowed, split examples together with the normalization reference
/// needed to invert predictions. This is the cacheable form of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedExamples {
    pub reference: NormalizationReference,
    pub train: Vec<WindowedExample>,
    pub validation: Vec<WindowedExample>,
    pub test: Vec<WindowedExample>,
}

/// The three prepared tensor sets handed to a training collaborator.
#[derive(Debug)]
pub struct Dataset {
    pub reference: NormalizationReference,
    pub train: SequenceSet,
    pub validation: SequenceSet,
    pub test: SequenceSet,
}

impl Dataset {
    /// Runs the full preparation pipeline for the configured data file.
    ///
    /// Read CSV, fit dataset-wide min-max bounds, group readings by calendar
    /// day, filter and truncate the groups, window each day into zero-padded
    /// prefix sequences, and route whole days into train/validation/test.
    /// The windowed form round-trips through the cache when enabled.
    #[instrument(skip(config))]
    pub fn prepare(config: &HelioConfig) -> Result<Self, HelioError> {
        info!("Preparing dataset...");

        if config.cache_enabled {
            match load_from_cache(config) {
                Ok(Some(prepared)) => {
                    return Self::from_prepared(prepared, config.sequence_length);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Error loading cache: {}. Preparing from source.", e);
                }
            }
        }

        let prepared = Self::prepare_examples(config)?;

        if config.cache_enabled {
            if let Err(e) = save_to_cache(config, &prepared) {
                warn!("Failed to save prepared dataset to cache: {}", e);
            }
        }

        Self::from_prepared(prepared, config.sequence_length)
    }

    /// The pure pipeline, cache and tensor assembly aside.
    pub fn prepare_examples(config: &HelioConfig) -> Result<PreparedExamples, HelioError> {
        let readings = load_readings(config)?;
        if readings.is_empty() {
            return Err(HelioError::InsufficientData {
                got: 0,
                required: config.min_readings_per_day,
                context: format!("No readings in {}", config.data_path.display()),
            });
        }

        let reference = NormalizationReference::fit(&readings)?;
        let groups = group_by_day(
            &readings,
            &reference,
            config.min_readings_per_day,
            config.max_readings_per_day,
        )?;
        if groups.is_empty() {
            return Err(HelioError::InsufficientData {
                got: 0,
                required: 1,
                context: format!(
                    "No day survived the minimum-{} filter",
                    config.min_readings_per_day
                ),
            });
        }
        info!(
            days = groups.len(),
            readings = readings.len(),
            "Grouped and filtered readings"
        );

        let examples = window_groups(&groups, config.sequence_length)?;
        let (train, validation, test) = split_examples(examples, SplitRule::from_config(config));

        Ok(PreparedExamples {
            reference,
            train,
            validation,
            test,
        })
    }

    fn from_prepared(
        prepared: PreparedExamples,
        sequence_length: usize,
    ) -> Result<Self, HelioError> {
        let dataset = Self {
            reference: prepared.reference,
            train: SequenceSet::from_examples(&prepared.train, sequence_length)?,
            validation: SequenceSet::from_examples(&prepared.validation, sequence_length)?,
            test: SequenceSet::from_examples(&prepared.test, sequence_length)?,
        };
        if dataset.train.is_empty() {
            return Err(HelioError::InsufficientData {
                got: 0,
                required: 1,
                context: "Training split is empty".to_string(),
            });
        }
        let shape = dataset.shape();
        info!(?shape, "Dataset prepared");
        Ok(dataset)
    }

    /// Shape of each split as `(examples, sequence_length, channels)`.
    pub fn shape(&self) -> HashMap<Split, (usize, usize, usize)> {
        [
            (Split::Train, &self.train),
            (Split::Validation, &self.validation),
            (Split::Test, &self.test),
        ]
        .into_iter()
        .map(|(split, set)| {
            let s = set.inputs.shape();
            (split, (s[0], s[1], s[2]))
        })
        .collect()
    }

    pub fn get(&self, split: Split) -> &SequenceSet {
        match split {
            Split::Train => &self.train,
            Split::Validation => &self.validation,
            Split::Test => &self.test,
        }
    }
}
