use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    data::{normalize::NormalizationReference, reading::Reading},
    error::HelioError,
};

/// All readings of one calendar date, reduced to their normalized cumulative
/// values, time-ordered. Ids are dense and reflect the order surviving days
/// were first encountered in the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayGroup {
    pub id: usize,
    pub date: NaiveDate,
    pub values: Vec<f64>,
}

impl DayGroup {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Partitions a time-ordered reading stream into per-day groups.
///
/// Days with fewer than `min_readings` readings are dropped (documented
/// filtering, not an error); days with more than `max_readings` keep only
/// their first `max_readings` readings in timestamp order. Inputs are not
/// mutated.
pub fn group_by_day(
    readings: &[Reading],
    reference: &NormalizationReference,
    min_readings: usize,
    max_readings: usize,
) -> Result<Vec<DayGroup>, HelioError> {
    for (row, pair) in readings.windows(2).enumerate() {
        if pair[1].timestamp < pair[0].timestamp {
            return Err(HelioError::UnsortedReadings { row: row + 1 });
        }
    }

    let mut groups: Vec<DayGroup> = Vec::new();
    let mut current_date: Option<NaiveDate> = None;
    let mut current_values: Vec<f64> = Vec::new();

    for reading in readings {
        let date = reading.date();
        if current_date != Some(date) {
            if let Some(prev) = current_date {
                finish_day(prev, &mut current_values, &mut groups, min_readings, max_readings);
            }
            current_date = Some(date);
        }
        current_values.push(reference.cumulative.normalize(reading.cumulative));
    }
    if let Some(prev) = current_date {
        finish_day(prev, &mut current_values, &mut groups, min_readings, max_readings);
    }

    debug!(groups = groups.len(), "Grouped readings by calendar day");
    Ok(groups)
}

fn finish_day(
    date: NaiveDate,
    values: &mut Vec<f64>,
    groups: &mut Vec<DayGroup>,
    min_readings: usize,
    max_readings: usize,
) {
    if values.len() < min_readings {
        debug!(
            %date,
            len = values.len(),
            min = min_readings,
            "Dropping short day"
        );
        values.clear();
        return;
    }
    if values.len() > max_readings {
        debug!(
            %date,
            len = values.len(),
            max = max_readings,
            "Truncating long day"
        );
        values.truncate(max_readings);
    }
    groups.push(DayGroup {
        id: groups.len(),
        date,
        values: std::mem::take(values),
    });
}
