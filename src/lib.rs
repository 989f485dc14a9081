// Keystash — Library root
//
// Re-exports the item facade, the encrypted vault store, the enclave
// (vault key) and the CLI modules.

pub mod cli;
pub mod enclave;
pub mod error;
pub mod item;
pub mod store;

pub use error::{KeystashError, Result};
pub use item::{AttributeMap, AttributeValue, ItemClass, ItemError, ItemStore, SecureStore, Status};
