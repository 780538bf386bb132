use thiserror::Error;

/// Failure to parse a query pattern. The detector treats every variant as
/// "pattern did not match"; parse errors never escape the sampling loop.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unsupported selector syntax: {0}")]
    Unsupported(String),
    #[error("malformed selector: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error(transparent)]
    Selector(#[from] SelectorError),
    #[error("probe failure: {0}")]
    Internal(String),
}

impl ProbeError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
