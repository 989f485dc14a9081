// Keystash — Item Module
//
// Typed items over a secure store. Values are JSON-encoded into the store's
// binary `v_Data` attribute and addressed by (class, key) plus any extra
// attributes the caller scopes them with.

mod attributes;
mod class;
pub mod codec;
mod error;
mod facade;
pub mod query;
mod secure_store;

pub use attributes::{attr, AttributeMap, AttributeValue};
pub use class::ItemClass;
pub use error::{ItemError, ItemResult};
pub use facade::ItemStore;
pub use secure_store::{SecureStore, Status, StoreResult};
