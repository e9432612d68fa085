use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("Invalid dimensions: width and height must be non-negative (got {width}x{height})")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PackError>;
