use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeriesCacheError {
    #[error("Invalid index: {0}")]
    InvalidIndex(usize),

    #[error("Index {index} out of range: series covers {begin}..={end}")]
    OutOfRange { index: usize, begin: usize, end: usize },

    #[error("Series has no bars")]
    EmptySeries,

    #[error("Indicator error: {0}")]
    Indicator(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Config source error: {0}")]
    ConfigSource(#[from] ::config::ConfigError),
}

pub type Result<T> = std::result::Result<T, SeriesCacheError>;
