// Keystash — Vault error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Vault not initialized — run `keystash init` first")]
    NotInitialized,

    #[error("Invalid vault key — the vault may be corrupted or the key is wrong")]
    InvalidKey,
}
