//! Error taxonomy shared by the gateway, the stores and the refresh engine.

use std::io;

/// Failures of the local key-value persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("stored value under `{key}` is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode value for `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures surfaced by the catalog gateway and the annotation-backed engine.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("session rejected by the server (status {status})")]
    Auth { status: u16 },
    #[error("server responded with status {status}: {message}")]
    Server { status: u16, message: String },
    #[error("{resource} was not found")]
    NotFound { resource: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl CatalogError {
    /// True for failures that invalidate the session and require a fresh login.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Short machine-friendly label used in logs and counters.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Auth { .. } => "auth",
            Self::Server { .. } => "server",
            Self::NotFound { .. } => "not_found",
            Self::Storage(_) => "storage",
        }
    }
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
pub type StorageResult<T> = std::result::Result<T, StorageError>;
