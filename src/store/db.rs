// Keystash — SQLCipher Vault
//
// Opens and initializes the encrypted SQLCipher database that holds items.
// The key is derived from the keyring-held master secret (see `enclave`)
// and set via PRAGMA before any table is touched.

use std::time::Duration;

use rusqlite::Connection;

use super::StoreError;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// An SQLCipher-encrypted SQLite connection holding the `items` table.
pub struct Vault {
    conn: Connection,
}

impl Vault {
    /// Open (or create) an encrypted vault at the given path.
    /// `hex_key` is the hex-encoded 32-byte key derived with Argon2id.
    pub fn open(path: &std::path::Path, hex_key: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        // Other processes may hold the write lock; wait for it rather than fail.
        conn.busy_timeout(BUSY_TIMEOUT)?;

        conn.pragma_update(None, "key", format!("x'{}'", hex_key))?;

        // A wrong key surfaces as "file is not a database" on first read.
        conn.execute_batch("SELECT count(*) FROM sqlite_master;")
            .map_err(|_| StoreError::InvalidKey)?;

        let vault = Self { conn };
        vault.run_migrations()?;

        tracing::debug!(path = %path.display(), "Vault opened");
        Ok(vault)
    }

    /// Open an in-memory vault (unencrypted, for testing only).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let vault = Self { conn };
        vault.run_migrations()?;
        Ok(vault)
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn run_migrations(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS items (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                class       TEXT NOT NULL,
                attributes  TEXT NOT NULL DEFAULT '{}',
                value_data  BLOB,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_items_class
                ON items(class);
            ",
        )?;

        tracing::debug!("Vault migrations completed");
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
