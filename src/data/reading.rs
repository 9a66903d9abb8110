use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{config::HelioConfig, error::HelioError, util::date_utils};

/// One half-hourly sensor reading. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    /// Instantaneous power at the timestamp.
    pub power: f64,
    /// Cumulative production total for the day so far.
    pub cumulative: f64,
}

/// Raw CSV row; fields are parsed individually so errors can name the column.
#[derive(Debug, Deserialize)]
struct RawRecord {
    timestamp: String,
    instantaneous_power: String,
    cumulative_total_power: String,
}

impl Reading {
    fn from_record(record: RawRecord, line: u64) -> Result<Self, HelioError> {
        let timestamp =
            date_utils::parse_timestamp(&record.timestamp).ok_or(HelioError::ParseError {
            value_name: "timestamp".to_string(),
            line,
        })?;
        let power: f64 =
            record
                .instantaneous_power
                .trim()
                .parse()
                .map_err(|_| HelioError::ParseError {
                    value_name: "instantaneous_power".to_string(),
                    line,
                })?;
        let cumulative: f64 = record
            .cumulative_total_power
            .trim()
            .parse()
            .map_err(|_| HelioError::ParseError {
                value_name: "cumulative_total_power".to_string(),
                line,
            })?;
        if !power.is_finite() {
            return Err(HelioError::ParseError {
                value_name: "instantaneous_power".to_string(),
                line,
            });
        }
        if !cumulative.is_finite() {
            return Err(HelioError::ParseError {
                value_name: "cumulative_total_power".to_string(),
                line,
            });
        }
        Ok(Self {
            timestamp,
            power,
            cumulative,
        })
    }

    /// The local calendar date this reading belongs to.
    pub fn date(&self) -> NaiveDate {
        date_utils::local_date(self.timestamp)
    }
}

/// Reads all readings from the configured data file.
///
/// The file must already exist locally; fetching it from `data-url` is the
/// responsibility of an external collaborator.
pub fn load_readings(config: &HelioConfig) -> Result<Vec<Reading>, HelioError> {
    if !config.data_path.exists() {
        return Err(HelioError::DataFileMissing {
            path: config.data_path.display().to_string(),
            url: config.data_url.clone(),
        });
    }
    read_csv(&config.data_path)
}

/// Parses a readings CSV with a `timestamp,instantaneous_power,cumulative_total_power` header.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Reading>, HelioError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Reading CSV");
    let mut reader = csv::Reader::from_path(path)?;
    let mut readings = Vec::new();
    for (index, result) in reader.deserialize::<RawRecord>().enumerate() {
        // Line 1 is the header row
        let line = index as u64 + 2;
        let record = result?;
        readings.push(Reading::from_record(record, line)?);
    }
    info!(
        count = readings.len(),
        path = %path.display(),
        "Loaded readings"
    );
    Ok(readings)
}
