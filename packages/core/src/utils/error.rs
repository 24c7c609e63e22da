// Типы ошибок движка самотестирования

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BistError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging initialization failed: {0}")]
    Logging(String),
}

impl From<serde_json::Error> for BistError {
    fn from(error: serde_json::Error) -> Self {
        BistError::Serialization(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BistError>;
