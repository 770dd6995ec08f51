use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Invalid table: {0}")]
    InvalidTable(String),

    #[error("Invalid time index: {0}")]
    InvalidIndex(String),

    #[error("Column index {index} is outside 0-{}", .columns.saturating_sub(1))]
    ColumnOutOfBounds { index: usize, columns: usize },

    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    #[error("Latitude {latitude} must be between {min} and {max}")]
    LatitudeOutOfRange { latitude: f64, min: f64, max: f64 },

    #[error("Unsupported variable '{found}', expected one of {expected}")]
    UnsupportedVariable { found: String, expected: String },

    #[error("Series '{left}' and '{right}' do not share a time index")]
    MisalignedSeries { left: String, right: String },

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Invalid coordinate format: {0}")]
    InvalidCoordinate(String),

    #[error("DSN {0} does not exist")]
    DsnNotFound(u32),

    #[error("DSN {0} is already in use")]
    DsnInUse(u32),

    #[error("DSN {dsn} is not valid for {variable}; expected one of {range}")]
    DsnOutOfRange {
        dsn: u32,
        variable: String,
        range: String,
    },

    #[error("No free DSN left for {0}")]
    NoFreeDsn(String),

    #[error("Series '{0}' is empty after removing invalid values")]
    EmptySeries(String),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl From<config::ConfigError> for ProcessingError {
    fn from(err: config::ConfigError) -> Self {
        ProcessingError::Config(err.to_string())
    }
}
