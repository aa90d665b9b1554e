use labwise_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("interpretation request failed: {0}")]
    Service(String),

    #[error("interpretation response did not match the expected shape: {0}")]
    Decode(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("interpretation store error: {0}")]
    Store(#[from] StoreError),
}
