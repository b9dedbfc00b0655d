use thiserror::Error;

#[derive(Error, Debug)]
pub enum TixError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Tix environment not initialized. Run \"tix init\" first.")]
    NotInitialized,

    #[error("{0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, TixError>;
