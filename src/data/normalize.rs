use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{data::reading::Reading, error::HelioError};

/// Min-max scaler for one numeric column.
///
/// Fitted once over the entire ingested dataset, then held immutably for the
/// lifetime of a run; the stored bounds serve both the forward transform and
/// the inverse transform of predictions back to physical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    min: f64,
    max: f64,
}

impl MinMaxScaler {
    /// Fits the scaler to a column of values.
    ///
    /// A constant-valued column makes the transform undefined and is reported
    /// as a data-quality error rather than left to produce non-finite output.
    pub fn fit(column: &str, values: &[f64]) -> Result<Self, HelioError> {
        if values.is_empty() {
            return Err(HelioError::InsufficientData {
                got: 0,
                required: 1,
                context: format!("No values to fit min-max bounds for column {}", column),
            });
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for (row, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(HelioError::NonFiniteValue {
                    column: column.to_string(),
                    row,
                });
            }
            min = min.min(value);
            max = max.max(value);
        }
        if min == max {
            return Err(HelioError::DegenerateColumn {
                column: column.to_string(),
                value: min,
            });
        }
        debug!(column, min, max, "Fitted min-max bounds");
        Ok(Self { min, max })
    }

    pub fn normalize(&self, x: f64) -> f64 {
        (x - self.min) / (self.max - self.min)
    }

    pub fn denormalize(&self, y: f64) -> f64 {
        y * (self.max - self.min) + self.min
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

/// Dataset-wide scaling bounds for both numeric columns, computed before any
/// grouping or filtering takes place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationReference {
    pub power: MinMaxScaler,
    pub cumulative: MinMaxScaler,
}

impl NormalizationReference {
    pub fn fit(readings: &[Reading]) -> Result<Self, HelioError> {
        let power_column: Vec<f64> = readings.iter().map(|r| r.power).collect();
        let cumulative_column: Vec<f64> = readings.iter().map(|r| r.cumulative).collect();
        Ok(Self {
            power: MinMaxScaler::fit("instantaneous_power", &power_column)?,
            cumulative: MinMaxScaler::fit("cumulative_total_power", &cumulative_column)?,
        })
    }
}
