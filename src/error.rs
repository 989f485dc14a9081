// Keystash — Top-level error types
//
// Aggregates errors from the item, store and enclave modules into a single
// error enum for the application boundary.

use thiserror::Error;

/// Top-level error type for all Keystash operations.
#[derive(Debug, Error)]
pub enum KeystashError {
    #[error("Item error: {0}")]
    Item(#[from] crate::item::ItemError),

    #[error("Vault error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("Enclave error: {0}")]
    Enclave(#[from] crate::enclave::EnclaveError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON value: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, KeystashError>;
