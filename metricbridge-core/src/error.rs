use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Regression task not found: {0}")]
    TaskNotFound(String),
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
    #[error("Empty data: {0}")]
    EmptyData(String),
    #[error("Metric not found: {0}")]
    MetricNotFound(String),
    #[error("Metric {metric} failed: {reason}")]
    MetricFailed { metric: String, reason: String },
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Parser error: {0}")]
    ParserError(String),
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::ParserError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
