use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Invalid rate: {0}")]
    InvalidRate(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("General error: {0}")]
    Other(String),
}

impl From<toml::de::Error> for ShapeError {
    fn from(err: toml::de::Error) -> Self {
        ShapeError::Config(err.to_string())
    }
}

impl From<anyhow::Error> for ShapeError {
    fn from(err: anyhow::Error) -> Self {
        ShapeError::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShapeError>;
