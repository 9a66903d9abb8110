use chrono::{NaiveDate, NaiveDateTime};

/// Timestamp formats accepted in source CSVs, tried in order.
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
];

/// Parses a reading timestamp, trying each accepted format.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// The local calendar date component of a timestamp.
pub fn local_date(timestamp: NaiveDateTime) -> NaiveDate {
    timestamp.date()
}
