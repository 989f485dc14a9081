// Keystash — Vault key
//
// The master secret is 32 random bytes held by a `KeySource` (the platform
// keyring in production). The vault key is never stored: it is re-derived
// from the secret with Argon2id on every unlock and handed out hex-encoded
// in a zeroizing buffer.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::EnclaveError;

const KEYRING_SERVICE: &str = "keystash-item-vault";
const KEYRING_USER: &str = "vault-master";

const MASTER_SECRET_LEN: usize = 32;
const VAULT_KEY_LEN: usize = 32;

// m=64 MiB, t=3, p=4
const ARGON2_M_COST: u32 = 65536;
const ARGON2_T_COST: u32 = 3;
const ARGON2_P_COST: u32 = 4;

/// Raw storage for the master secret.
pub trait KeySource {
    /// The stored secret, or `None` when none has been created yet.
    fn load(&self) -> Result<Option<Zeroizing<Vec<u8>>>, EnclaveError>;

    fn store(&self, secret: &[u8]) -> Result<(), EnclaveError>;

    /// Remove the secret. Returns whether one existed.
    /// WARNING: the vault cannot be opened again afterwards.
    fn erase(&self) -> Result<bool, EnclaveError>;

    /// Context the derivation salt is built from; unique per source.
    fn salt_context(&self) -> String;
}

/// `KeySource` backed by the platform keyring via the `keyring` crate
/// (Keychain on macOS, Credential Manager on Windows, Secret Service on Linux).
pub struct KeyringSource {
    service: String,
    user: String,
}

impl KeyringSource {
    pub fn new() -> Self {
        Self::with_names(KEYRING_SERVICE, KEYRING_USER)
    }

    pub fn with_names(service: &str, user: &str) -> Self {
        Self {
            service: service.to_string(),
            user: user.to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, EnclaveError> {
        keyring::Entry::new(&self.service, &self.user)
            .map_err(|e| EnclaveError::Keyring(format!("failed to open keyring entry: {}", e)))
    }
}

impl Default for KeyringSource {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for KeyringSource {
    fn load(&self) -> Result<Option<Zeroizing<Vec<u8>>>, EnclaveError> {
        match self.entry()?.get_secret() {
            Ok(secret) => Ok(Some(Zeroizing::new(secret))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(EnclaveError::Keyring(format!(
                "failed to read master secret: {}",
                e
            ))),
        }
    }

    fn store(&self, secret: &[u8]) -> Result<(), EnclaveError> {
        self.entry()?
            .set_secret(secret)
            .map_err(|e| EnclaveError::Keyring(format!("failed to store master secret: {}", e)))
    }

    fn erase(&self) -> Result<bool, EnclaveError> {
        match self.entry()?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(EnclaveError::Keyring(format!(
                "failed to delete master secret: {}",
                e
            ))),
        }
    }

    fn salt_context(&self) -> String {
        format!("{}::{}", self.service, self.user)
    }
}

fn generate_master_secret() -> Zeroizing<Vec<u8>> {
    let mut secret = Zeroizing::new(vec![0u8; MASTER_SECRET_LEN]);
    rand::rng().fill_bytes(&mut secret);
    secret
}

/// Derive the hex-encoded SQLCipher key from a master secret.
/// Salt = SHA-256(salt context), so a given source always yields the same key.
pub fn derive_vault_key(
    master_secret: &[u8],
    salt_context: &str,
) -> Result<Zeroizing<String>, EnclaveError> {
    if master_secret.len() != MASTER_SECRET_LEN {
        return Err(EnclaveError::InvalidSecretLength(
            master_secret.len(),
            MASTER_SECRET_LEN,
        ));
    }

    let salt = Sha256::digest(salt_context.as_bytes());
    let params = Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, Some(VAULT_KEY_LEN))
        .map_err(|e| EnclaveError::Derivation(format!("invalid Argon2 params: {}", e)))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new(vec![0u8; VAULT_KEY_LEN]);
    argon2
        .hash_password_into(master_secret, &salt, &mut key)
        .map_err(|e| EnclaveError::Derivation(format!("Argon2id hash failed: {}", e)))?;

    Ok(Zeroizing::new(
        key.iter().map(|b| format!("{:02x}", b)).collect(),
    ))
}

/// Load the master secret and derive the vault key. With `create`, a missing
/// secret is generated and stored first; without it, a missing secret is
/// `MasterSecretNotFound`.
pub fn unlock(source: &dyn KeySource, create: bool) -> Result<Zeroizing<String>, EnclaveError> {
    let secret = match source.load()? {
        Some(secret) => {
            tracing::debug!("Loaded vault master secret");
            secret
        }
        None if create => {
            tracing::info!("No vault master secret found — generating one");
            let secret = generate_master_secret();
            source.store(&secret)?;
            secret
        }
        None => return Err(EnclaveError::MasterSecretNotFound),
    };

    derive_vault_key(&secret, &source.salt_context())
}

// ─── In-Memory Mock for Testing ──────────────────────────────────────────────


// ─── Tests ───────────────────────────────────────────────────────────────────
