//! Error types for record persistence.

/// Errors returned by record storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Invalid slot name.
    #[error("invalid slot name: {0}")]
    InvalidSlot(String),
    /// The id generator kept returning ids already in use.
    #[error("no unused record id after {0} attempts")]
    IdsExhausted(usize),
    /// Backend-specific failure.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
