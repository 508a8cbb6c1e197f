//! Config loading errors.

use thiserror::Error;

/// Why a `healthlog.json5` layer or the merged config was rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The layer file could not be read.
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// The layer is not valid JSON5.
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] json5::Error),
    /// The merged document does not match the config types.
    #[error("failed to decode config: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// A key is unknown, mistyped or out of range; `path` is `layer:key.path`
    /// for schema checks and the bare key path for merged-config checks.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
}
