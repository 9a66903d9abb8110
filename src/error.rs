use chrono::NaiveDate;

#[derive(Debug, thiserror::Error)]
pub enum HelioError {
    #[error("Failed to parse value {value_name} on line {line}.")]
    ParseError { value_name: String, line: u64 },
    #[error("Data file not found at {path}. Fetch it from {url} before running the pipeline.")]
    DataFileMissing { path: String, url: String },
    #[error("Column {column} is constant-valued ({value}); min-max normalization is undefined.")]
    DegenerateColumn { column: String, value: f64 },
    #[error("Column {column} contains a non-finite value at row {row}.")]
    NonFiniteValue { column: String, row: usize },
    #[error("Readings are not in timestamp order at row {row}.")]
    UnsortedReadings { row: usize },
    #[error("Day group ids are not strictly increasing ({prev} followed by {next}); windower invoked before grouping?")]
    UnorderedDayGroups { prev: usize, next: usize },
    #[error("Day group {date} has {len} readings; at least 2 are required to window.")]
    DayGroupTooShort { date: NaiveDate, len: usize },
    #[error("Insufficient data: got {got}, required {required}. Context: {context}")]
    InsufficientData {
        got: usize,
        required: usize,
        context: String,
    },
    #[error("Inconsistent set lengths: {0} inputs, {1} targets, {2} dates.")]
    InvalidSetLengths(usize, usize, usize),
    #[error("Config Error: {0}")]
    ConfigError(String),
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse date: {0}")]
    ParseDateError(#[from] chrono::ParseError),
    #[error("Serde YAML Error: {0}")]
    SerdeYamlError(#[from] serde_yaml::Error),
    #[error("CSV Error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Shape Error: {0}")]
    ShapeError(#[from] ndarray::ShapeError),
    #[error("Failed to fit PLS model: {0}")]
    FitError(#[from] linfa_pls::PlsError),
}
