use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherWatchError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Message transport error: {0}")]
    Transport(String),

    #[error("Advisory composer error: {0}")]
    Composer(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Missing weather field: {0}")]
    MissingField(&'static str),
}

pub type Result<T> = std::result::Result<T, WeatherWatchError>;
