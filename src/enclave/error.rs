// Keystash — Enclave error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnclaveError {
    #[error("Keyring error: {0}")]
    Keyring(String),

    #[error("Key derivation error: {0}")]
    Derivation(String),

    #[error("Vault master secret not found — run `keystash init` first")]
    MasterSecretNotFound,

    #[error("Master secret has the wrong length ({0} bytes, expected {1})")]
    InvalidSecretLength(usize, usize),
}
