use thiserror::Error;

use waitwise_core_types::WaitError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode failure: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<StoreError> for WaitError {
    fn from(value: StoreError) -> Self {
        WaitError::new(value.to_string())
    }
}
