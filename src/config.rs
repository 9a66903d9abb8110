use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_yaml::from_reader;
use tracing::{debug, info, instrument};

use crate::{error::HelioError, model::spec::TrainerSpec};

/// Pipeline configuration, read from a YAML file.
///
/// The grouping, windowing and split parameters default to the values used by
/// the source dataset (half-hourly solar readings, 8-14 readings per day,
/// decade-cycle split) but are all tunable from the config file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HelioConfig {
    #[serde(rename = "data-path")]
    pub data_path: PathBuf,
    #[serde(rename = "data-url")]
    pub data_url: String,
    #[serde(rename = "min-readings-per-day", default = "default_min_readings")]
    pub min_readings_per_day: usize,
    #[serde(rename = "max-readings-per-day", default = "default_max_readings")]
    pub max_readings_per_day: usize,
    #[serde(rename = "sequence-length", default = "default_sequence_length")]
    pub sequence_length: usize,
    #[serde(rename = "split-modulus", default = "default_split_modulus")]
    pub split_modulus: usize,
    #[serde(rename = "test-remainder", default = "default_test_remainder")]
    pub test_remainder: usize,
    #[serde(
        rename = "validation-remainder",
        default = "default_validation_remainder"
    )]
    pub validation_remainder: usize,
    #[serde(rename = "cache-enabled", default = "default_cache_enabled")]
    pub cache_enabled: bool,
    #[serde(default)]
    pub trainer: TrainerSpec,
    /// Resolved at load time, never read from the file.
    #[serde(skip)]
    pub cache_dir: Option<PathBuf>,
}

fn default_min_readings() -> usize {
    8
}

fn default_max_readings() -> usize {
    14
}

fn default_sequence_length() -> usize {
    14
}

fn default_split_modulus() -> usize {
    10
}

fn default_test_remainder() -> usize {
    0
}

fn default_validation_remainder() -> usize {
    9
}

fn default_cache_enabled() -> bool {
    true
}

const DEFAULT_DATA: &str = r#"
data-path: "data/solar.csv"
data-url: "https://raw.githubusercontent.com/plotly/datasets/master/solar.csv"
min-readings-per-day: 8
max-readings-per-day: 14
sequence-length: 14
split-modulus: 10
test-remainder: 0
validation-remainder: 9
cache-enabled: true
"#;

impl Default for HelioConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/solar.csv"),
            data_url: "https://raw.githubusercontent.com/plotly/datasets/master/solar.csv"
                .to_string(),
            min_readings_per_day: default_min_readings(),
            max_readings_per_day: default_max_readings(),
            sequence_length: default_sequence_length(),
            split_modulus: default_split_modulus(),
            test_remainder: default_test_remainder(),
            validation_remainder: default_validation_remainder(),
            cache_enabled: default_cache_enabled(),
            trainer: TrainerSpec::default(),
            cache_dir: None,
        }
    }
}

impl HelioConfig {
    /// Reads the configuration from a YAML file.
    ///
    /// If the file does not exist, it creates a default configuration file.
    #[instrument(level = "info", skip(filename))]
    pub fn read_config<P: AsRef<Path>>(filename: Option<P>) -> Result<Self, HelioError> {
        let path = filename
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or_else(|| Path::new("config.yml").to_path_buf());

        info!(path = %path.display(), "Reading configuration");

        if !path.exists() {
            info!(
                "Config file does not exist. Creating default config at {}",
                path.display()
            );
            let mut file = File::create(&path)?;
            file.write_all(DEFAULT_DATA.as_bytes())?;
            debug!("Default configuration file created");
            let mut config = HelioConfig::default();
            config.resolve_cache_dir()?;
            return Ok(config);
        }

        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let mut config: Self = from_reader(reader)?;
        config.validate()?;
        config.resolve_cache_dir()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Checks the cross-field constraints the parameters must satisfy.
    pub fn validate(&self) -> Result<(), HelioError> {
        if self.min_readings_per_day < 2 {
            return Err(HelioError::ConfigError(format!(
                "min-readings-per-day must be at least 2, got {}",
                self.min_readings_per_day
            )));
        }
        if self.max_readings_per_day < self.min_readings_per_day {
            return Err(HelioError::ConfigError(format!(
                "max-readings-per-day ({}) is below min-readings-per-day ({})",
                self.max_readings_per_day, self.min_readings_per_day
            )));
        }
        if self.sequence_length < self.max_readings_per_day {
            return Err(HelioError::ConfigError(format!(
                "sequence-length ({}) cannot hold a full day of {} readings",
                self.sequence_length, self.max_readings_per_day
            )));
        }
        if self.split_modulus < 3 {
            return Err(HelioError::ConfigError(format!(
                "split-modulus must be at least 3 to leave room for all three sets, got {}",
                self.split_modulus
            )));
        }
        if self.test_remainder >= self.split_modulus
            || self.validation_remainder >= self.split_modulus
        {
            return Err(HelioError::ConfigError(format!(
                "split remainders ({}, {}) must be below the modulus ({})",
                self.test_remainder, self.validation_remainder, self.split_modulus
            )));
        }
        if self.test_remainder == self.validation_remainder {
            return Err(HelioError::ConfigError(format!(
                "test and validation remainders are both {}",
                self.test_remainder
            )));
        }
        Ok(())
    }

    fn resolve_cache_dir(&mut self) -> Result<(), HelioError> {
        if !self.cache_enabled {
            return Ok(());
        }
        let dirs = ProjectDirs::from("", "", "helio").ok_or_else(|| {
            HelioError::ConfigError("Could not determine a cache directory".to_string())
        })?;
        let cache_dir = dirs.cache_dir().to_path_buf();
        if !cache_dir.exists() {
            std::fs::create_dir_all(&cache_dir)?;
        }
        debug!(cache_dir = %cache_dir.display(), "Resolved cache directory");
        self.cache_dir = Some(cache_dir);
        Ok(())
    }
}
