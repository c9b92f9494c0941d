use thiserror::Error;

/// Core error type shared across Phoney crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The payload is not valid JSON or does not match the contract.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// The request is well-formed JSON but violates the contract.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Convenience alias for results returned by Phoney crates.
pub type Result<T> = std::result::Result<T, Error>;
