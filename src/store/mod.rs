pub mod kv;
pub mod progress;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid entry name: {0:?}")]
    InvalidName(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
