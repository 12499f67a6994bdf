use thiserror::Error;

#[derive(Error, Debug)]
pub enum WindWatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid forecast data: {0}")]
    Validation(#[from] ValidationError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Cancelled")]
    Cancelled,
}

/// Shape problems in a provider payload
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("no daily data returned")]
    EmptyData,

    #[error("{field} has {actual} entries, expected {expected}")]
    ShapeMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unparseable date {value:?}: {source}")]
    DateParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

pub type Result<T> = std::result::Result<T, WindWatchError>;
