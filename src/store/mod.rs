// Keystash — Store Module
//
// The encrypted vault that backs the item facade. Items live in an
// SQLCipher database; `SqliteKeychain` exposes it through `SecureStore`.

mod db;
mod error;
mod keychain;
mod schema;

pub use db::Vault;
pub use error::StoreError;
pub use keychain::{SqliteKeychain, MAX_VALUE_LEN};
