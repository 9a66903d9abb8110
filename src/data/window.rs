use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{data::day_group::DayGroup, error::HelioError};

/// One training pair: a fixed-length, right-zero-padded prefix of a day's
/// normalized cumulative values, and that day's target (the maximum
/// normalized cumulative value, shared by every example of the day).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowedExample {
    pub input: Vec<f64>,
    pub target: f64,
    pub day_id: usize,
    pub date: NaiveDate,
}

/// Expands each day group into its prefix sequences.
///
/// For a group of `n` values this emits exactly `n - 1` examples, one per
/// prefix length `i` in `2..=n`, with positions `0..i` holding the first `i`
/// values and the remainder zero. Groups are processed in ascending id order
/// and prefixes in increasing length order; the ordering exists so downstream
/// splits are reproducible.
///
/// Padding caveat: zero is also a legitimate physical reading, so a padded
/// position is not distinguishable from a true zero observation. Consumers
/// must treat trailing zeros as padding; no sentinel is invented here.
///
/// Groups run through rayon in parallel; emission order is unaffected since
/// per-group outputs are concatenated in id order.
pub fn window_groups(
    groups: &[DayGroup],
    sequence_length: usize,
) -> Result<Vec<WindowedExample>, HelioError> {
    for pair in groups.windows(2) {
        if pair[1].id <= pair[0].id {
            return Err(HelioError::UnorderedDayGroups {
                prev: pair[0].id,
                next: pair[1].id,
            });
        }
    }

    let per_group: Vec<Vec<WindowedExample>> = groups
        .par_iter()
        .map(|group| window_group(group, sequence_length))
        .collect::<Result<_, _>>()?;

    let examples: Vec<WindowedExample> = per_group.into_iter().flatten().collect();
    debug!(
        groups = groups.len(),
        examples = examples.len(),
        "Windowed day groups"
    );
    Ok(examples)
}

fn window_group(
    group: &DayGroup,
    sequence_length: usize,
) -> Result<Vec<WindowedExample>, HelioError> {
    let n = group.len();
    if n < 2 {
        // Contract violation: the minimum-size day filter should have removed
        // this group long before it reached the windower.
        return Err(HelioError::DayGroupTooShort {
            date: group.date,
            len: n,
        });
    }
    if n > sequence_length {
        return Err(HelioError::InsufficientData {
            got: sequence_length,
            required: n,
            context: format!(
                "Sequence buffer cannot hold day group {} of {} readings",
                group.date, n
            ),
        });
    }

    let target = group
        .values
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    let mut examples = Vec::with_capacity(n - 1);
    for i in 2..=n {
        let mut input = vec![0.0; sequence_length];
        input[..i].copy_from_slice(&group.values[..i]);
        examples.push(WindowedExample {
            input,
            target,
            day_id: group.id,
            date: group.date,
        });
    }
    Ok(examples)
}
