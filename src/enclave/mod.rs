// Keystash — Enclave Module
//
// Keeps the vault's master secret in the platform keyring and derives the
// SQLCipher key from it with Argon2id.

mod error;
mod vault_key;

pub use error::EnclaveError;
pub use vault_key::{derive_vault_key, unlock, KeySource, KeyringSource};
