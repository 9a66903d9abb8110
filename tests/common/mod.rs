use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use helio::config::HelioConfig;
use tempfile::TempDir;

/// Base date for synthetic fixtures; consecutive slices land on consecutive days.
pub fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 6, 1).unwrap()
}

/// Writes a readings CSV with one slice of cumulative values per calendar day.
/// Readings start at 05:00 on half-hour steps; instantaneous power is derived
/// so the column is non-degenerate.
pub fn write_readings_csv(path: &Path, days: &[Vec<f64>]) {
    let mut file = std::fs::File::create(path).unwrap();
    writeln!(
        file,
        "timestamp,instantaneous_power,cumulative_total_power"
    )
    .unwrap();
    for (day_index, cumulative_values) in days.iter().enumerate() {
        let date = base_date() + Days::new(day_index as u64);
        for (slot, cumulative) in cumulative_values.iter().enumerate() {
            let timestamp = date
                .and_hms_opt(5 + slot as u32 / 2, (slot as u32 % 2) * 30, 0)
                .unwrap();
            let power = cumulative / 10.0 + slot as f64;
            writeln!(
                file,
                "{},{},{}",
                timestamp.format("%Y-%m-%d %H:%M:%S"),
                power,
                cumulative
            )
            .unwrap();
        }
    }
}

/// A config pointing at a fresh fixture CSV, with caching confined to the
/// temp directory (or disabled when `cache` is false).
pub fn fixture_config(dir: &TempDir, days: &[Vec<f64>], cache: bool) -> HelioConfig {
    let data_path: PathBuf = dir.path().join("solar.csv");
    write_readings_csv(&data_path, days);
    HelioConfig {
        data_path,
        cache_enabled: cache,
        cache_dir: cache.then(|| dir.path().join("cache")),
        ..Default::default()
    }
}

/// An 8-14 reading ramp for one day, ending at `peak`.
pub fn ramp(len: usize, peak: f64) -> Vec<f64> {
    (1..=len).map(|i| peak * i as f64 / len as f64).collect()
}
