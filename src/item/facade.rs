// Keystash — Item store facade
//
// Typed read / save / update / delete / upsert / delete-all over any
// `SecureStore`. Statuses are mapped to `ItemError` at each primitive call.
//
// `upsert` is read-then-write and NOT atomic: another writer can create,
// change or remove the item between the two calls. No lock, retry or
// detection is attempted here; the store's per-call atomicity is all there is.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::attributes::{attr, AttributeMap};
use super::class::ItemClass;
use super::codec;
use super::error::{ItemError, ItemResult};
use super::query;
use super::secure_store::{SecureStore, Status};

pub struct ItemStore<S> {
    store: S,
}

impl<S: SecureStore> ItemStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read the item at (class, key) and decode it as `T`.
    pub fn read<T: DeserializeOwned>(
        &self,
        class: ItemClass,
        key: &str,
        extra: Option<&AttributeMap>,
    ) -> ItemResult<T> {
        tracing::debug!(class = %class, key = %key, "Reading item");
        let query = query::build_read_query(class, key, extra);
        let record = self.store.copy_matching(&query)?;
        codec::decode_record(&record)
    }

    /// Create the item at (class, key). Extras are written with it.
    pub fn save<T: Serialize + ?Sized>(
        &self,
        value: &T,
        class: ItemClass,
        key: &str,
        extra: Option<&AttributeMap>,
    ) -> ItemResult<()> {
        tracing::debug!(class = %class, key = %key, "Saving item");
        let bytes = codec::encode(value)?;
        let attributes = query::build_write_query(class, key, bytes, extra);
        self.store.add(&attributes)?;
        tracing::info!(class = %class, key = %key, "Item saved");
        Ok(())
    }

    /// Replace the value of the existing item at (class, key). Extras only
    /// narrow the match; the sole attribute written is the value data.
    pub fn update<T: Serialize + ?Sized>(
        &self,
        value: &T,
        class: ItemClass,
        key: &str,
        extra: Option<&AttributeMap>,
    ) -> ItemResult<()> {
        tracing::debug!(class = %class, key = %key, "Updating item");
        let bytes = codec::encode(value)?;
        let matching = query::build_match_query(class, key, extra);
        let changes = AttributeMap::new().with(attr::VALUE_DATA, bytes);
        self.store.update(&matching, &changes)?;
        tracing::info!(class = %class, key = %key, "Item updated");
        Ok(())
    }

    /// Remove the item at (class, key). A missing item is not an error.
    pub fn delete(&self, class: ItemClass, key: &str, extra: Option<&AttributeMap>) -> ItemResult<()> {
        tracing::debug!(class = %class, key = %key, "Deleting item");
        let matching = query::build_match_query(class, key, extra);
        match self.store.delete(&matching) {
            Ok(()) => {
                tracing::info!(class = %class, key = %key, "Item deleted");
                Ok(())
            }
            Err(Status::ITEM_NOT_FOUND) => {
                tracing::debug!(class = %class, key = %key, "No item to delete");
                Ok(())
            }
            Err(status) => Err(status.into()),
        }
    }

    /// Update the item if a read finds it, save it if the read reports it
    /// missing. Any other read failure is returned without writing.
    /// The existing value's shape is not checked: a stored value that would
    /// not decode as `T` is replaced rather than reported as `InvalidData`.
    pub fn upsert<T: Serialize + ?Sized>(
        &self,
        value: &T,
        class: ItemClass,
        key: &str,
        extra: Option<&AttributeMap>,
    ) -> ItemResult<()> {
        match self.read::<serde::de::IgnoredAny>(class, key, extra) {
            Ok(_) => self.update(value, class, key, extra),
            Err(ItemError::ItemNotFound) => self.save(value, class, key, extra),
            Err(e) => Err(e),
        }
    }

    /// Remove every item of every class. Stops at the first failure other
    /// than "not found"; classes already cleared stay cleared.
    pub fn delete_all(&self) -> ItemResult<()> {
        for class in ItemClass::ALL {
            let query = AttributeMap::new().with(attr::CLASS, class.native());
            match self.store.delete(&query) {
                Ok(()) => tracing::info!(class = %class, "Cleared item class"),
                Err(Status::ITEM_NOT_FOUND) => {
                    tracing::debug!(class = %class, "Item class already empty")
                }
                Err(status) => {
                    tracing::warn!(class = %class, status = %status, "Wipe aborted");
                    return Err(status.into());
                }
            }
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::attributes::AttributeValue;
    use crate::item::secure_store::mock::{Call, MockSecureStore, Op};
    use serde::Deserialize;
    use serde_json::{json, Value};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Account {
        user: String,
        token: String,
    }

    fn account(token: &str) -> Account {
        Account {
            user: "octocat".to_string(),
            token: token.to_string(),
        }
    }

    #[test]
    fn test_save_then_read_returns_value() {
        let items = ItemStore::new(MockSecureStore::new());
        items
            .save(&account("t1"), ItemClass::Generic, "github", None)
            .unwrap();

        let back: Account = items.read(ItemClass::Generic, "github", None).unwrap();
        assert_eq!(back, account("t1"));
    }

    #[test]
    fn test_read_missing_is_item_not_found() {
        let items = ItemStore::new(MockSecureStore::new());
        let result = items.read::<Value>(ItemClass::Generic, "absent", None);
        assert_eq!(result, Err(ItemError::ItemNotFound));
    }

    #[test]
    fn test_read_wrong_shape_is_invalid_data() {
        let items = ItemStore::new(MockSecureStore::new());
        items.save("just a string", ItemClass::Generic, "k", None).unwrap();
        let result = items.read::<Account>(ItemClass::Generic, "k", None);
        assert_eq!(result, Err(ItemError::InvalidData));
    }

    #[test]
    fn test_read_record_without_data_is_invalid_data() {
        let items = ItemStore::new(MockSecureStore::new());
        items.save(&1, ItemClass::Generic, "k", None).unwrap();

        // The caller's extras switch data retrieval off.
        let extra = AttributeMap::new().with(attr::RETURN_DATA, false);
        let result = items.read::<i32>(ItemClass::Generic, "k", Some(&extra));
        assert_eq!(result, Err(ItemError::InvalidData));
    }

    #[test]
    fn test_save_duplicate_is_duplicate_item() {
        let items = ItemStore::new(MockSecureStore::new());
        items.save(&account("a"), ItemClass::Generic, "k", None).unwrap();
        let result = items.save(&account("b"), ItemClass::Generic, "k", None);
        assert_eq!(result, Err(ItemError::DuplicateItem));
    }

    #[test]
    fn test_extra_attributes_scope_identity() {
        let items = ItemStore::new(MockSecureStore::new());
        let prod = AttributeMap::new().with(attr::SERVICE, "prod");
        let staging = AttributeMap::new().with(attr::SERVICE, "staging");

        items.save(&account("p"), ItemClass::Generic, "k", Some(&prod)).unwrap();
        items
            .save(&account("s"), ItemClass::Generic, "k", Some(&staging))
            .unwrap();

        let p: Account = items.read(ItemClass::Generic, "k", Some(&prod)).unwrap();
        let s: Account = items.read(ItemClass::Generic, "k", Some(&staging)).unwrap();
        assert_eq!(p.token, "p");
        assert_eq!(s.token, "s");
    }

    #[test]
    fn test_update_missing_is_item_not_found() {
        let items = ItemStore::new(MockSecureStore::new());
        let result = items.update(&account("x"), ItemClass::Generic, "k", None);
        assert_eq!(result, Err(ItemError::ItemNotFound));
    }

    #[test]
    fn test_update_matches_on_extras_but_writes_only_value() {
        let store = MockSecureStore::new();
        let items = ItemStore::new(&store);
        let extra = AttributeMap::new().with(attr::LABEL, "primary");
        items.save(&account("a"), ItemClass::Generic, "k", Some(&extra)).unwrap();
        store.clear_calls();

        items
            .update(&account("b"), ItemClass::Generic, "k", Some(&extra))
            .unwrap();

        let calls = store.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            Call::Update(matching, changes) => {
                assert_eq!(matching.get(attr::LABEL), Some(&AttributeValue::from("primary")));
                assert!(!matching.contains(attr::VALUE_DATA));
                assert_eq!(changes.len(), 1, "Only the value data is written");
                assert!(changes.contains(attr::VALUE_DATA));
            }
            other => panic!("Expected an update call, got {:?}", other),
        }
    }

    #[test]
    fn test_update_preserves_identity_and_attributes() {
        let items = ItemStore::new(MockSecureStore::new());
        let extra = AttributeMap::new().with(attr::LABEL, "primary");
        items.save(&account("a"), ItemClass::Generic, "k", Some(&extra)).unwrap();
        items.update(&account("b"), ItemClass::Generic, "k", None).unwrap();

        let back: Account = items.read(ItemClass::Generic, "k", Some(&extra)).unwrap();
        assert_eq!(back, account("b"));
    }

    #[test]
    fn test_delete_missing_is_ok() {
        let items = ItemStore::new(MockSecureStore::new());
        assert!(items.delete(ItemClass::Certificate, "absent", None).is_ok());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let items = ItemStore::new(MockSecureStore::new());
        items.save(&1, ItemClass::Generic, "k", None).unwrap();

        items.delete(ItemClass::Generic, "k", None).unwrap();
        items.delete(ItemClass::Generic, "k", None).unwrap();
        assert_eq!(
            items.read::<i32>(ItemClass::Generic, "k", None),
            Err(ItemError::ItemNotFound)
        );
    }

    #[test]
    fn test_delete_propagates_other_failures() {
        let store = MockSecureStore::new();
        store.fail_on(Op::Delete, Status::new(-34018));
        let items = ItemStore::new(&store);
        assert_eq!(
            items.delete(ItemClass::Generic, "k", None),
            Err(ItemError::Unexpected(-34018))
        );
    }

    #[test]
    fn test_upsert_creates_when_absent() {
        let store = MockSecureStore::new();
        let items = ItemStore::new(&store);

        items.upsert(&account("new"), ItemClass::Generic, "k", None).unwrap();

        assert_eq!(store.count(Op::Add), 1);
        assert_eq!(store.count(Op::Update), 0);
        let back: Account = items.read(ItemClass::Generic, "k", None).unwrap();
        assert_eq!(back, account("new"));
    }

    #[test]
    fn test_upsert_replaces_when_present() {
        let store = MockSecureStore::new();
        let items = ItemStore::new(&store);
        items.save(&account("v1"), ItemClass::Generic, "k", None).unwrap();
        store.clear_calls();

        items.upsert(&account("v2"), ItemClass::Generic, "k", None).unwrap();

        assert_eq!(store.count(Op::Update), 1);
        assert_eq!(store.count(Op::Add), 0);
        let back: Account = items.read(ItemClass::Generic, "k", None).unwrap();
        assert_eq!(back, account("v2"));
    }

    #[test]
    fn test_upsert_present_value_of_other_shape_still_updates() {
        let store = MockSecureStore::new();
        let items = ItemStore::new(&store);
        items.save("old", ItemClass::Generic, "k", None).unwrap();

        items.upsert(&account("v2"), ItemClass::Generic, "k", None).unwrap();
        assert_eq!(store.count(Op::Update), 1);
    }

    #[test]
    fn test_upsert_does_not_write_on_other_read_failure() {
        let store = MockSecureStore::new();
        store.fail_on(Op::CopyMatching, Status::NO_SUCH_ATTR);
        let items = ItemStore::new(&store);

        let result = items.upsert(&account("x"), ItemClass::Generic, "k", None);

        assert_eq!(result, Err(ItemError::IncorrectAttributeForClass));
        assert_eq!(store.count(Op::Add), 0);
        assert_eq!(store.count(Op::Update), 0);
    }

    #[test]
    fn test_upsert_does_not_save_on_unexpected_status() {
        let store = MockSecureStore::new();
        store.fail_on(Op::CopyMatching, Status::new(-25308));
        let items = ItemStore::new(&store);

        let result = items.upsert(&account("x"), ItemClass::Generic, "k", None);

        assert_eq!(result, Err(ItemError::Unexpected(-25308)));
        assert_eq!(store.count(Op::Add), 0);
    }

    #[test]
    fn test_delete_all_clears_every_class() {
        let store = MockSecureStore::new();
        let items = ItemStore::new(&store);
        for class in ItemClass::ALL {
            items.save(&class.name(), class, "k", None).unwrap();
        }

        items.delete_all().unwrap();

        assert_eq!(store.item_count(), 0);
        for class in ItemClass::ALL {
            assert_eq!(
                items.read::<String>(class, "k", None),
                Err(ItemError::ItemNotFound)
            );
        }
    }

    #[test]
    fn test_delete_all_visits_all_classes_in_order() {
        let store = MockSecureStore::new();
        let items = ItemStore::new(&store);
        items.delete_all().unwrap();

        let queried: Vec<AttributeMap> = store
            .calls()
            .into_iter()
            .map(|call| match call {
                Call::Delete(query) => query,
                other => panic!("Unexpected call {:?}", other),
            })
            .collect();
        let expected: Vec<AttributeMap> = ItemClass::ALL
            .iter()
            .map(|c| AttributeMap::new().with(attr::CLASS, c.native()))
            .collect();
        assert_eq!(queried, expected);
    }

    #[test]
    fn test_delete_all_aborts_without_rollback() {
        let store = MockSecureStore::new();
        let items = ItemStore::new(&store);
        for class in ItemClass::ALL {
            items.save(&1, class, "k", None).unwrap();
        }
        store.fail_on_class(Op::Delete, "keys", Status::IO);
        store.clear_calls();

        assert_eq!(items.delete_all(), Err(ItemError::Unexpected(-36)));

        // Generic and Certificate were cleared, CryptoKey failed, Identity untouched.
        assert_eq!(store.count(Op::Delete), 3);
        assert_eq!(store.item_count(), 2);
        assert_eq!(
            items.read::<i32>(ItemClass::Generic, "k", None),
            Err(ItemError::ItemNotFound)
        );
        assert_eq!(items.read::<i32>(ItemClass::Identity, "k", None), Ok(1));
    }

    #[test]
    fn test_status_mapping_through_primitives() {
        let store = MockSecureStore::new();
        store.fail_on(Op::Add, Status::DATA_TOO_LARGE);
        let items = ItemStore::new(&store);
        assert_eq!(
            items.save(&1, ItemClass::Generic, "k", None),
            Err(ItemError::InvalidData)
        );
    }

    #[test]
    fn test_example_scenario() {
        let store = MockSecureStore::new();
        let items = ItemStore::new(&store);

        items
            .save(&json!({"name": "ex"}), ItemClass::Generic, "com.example", None)
            .unwrap();
        let back: Value = items.read(ItemClass::Generic, "com.example", None).unwrap();
        assert_eq!(back, json!({"name": "ex"}));

        store.clear_calls();
        items
            .upsert(&json!({"name": "changed"}), ItemClass::Generic, "com.example", None)
            .unwrap();

        let updates: Vec<(AttributeMap, AttributeMap)> = store
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Update(matching, changes) => Some((matching, changes)),
                _ => None,
            })
            .collect();
        assert_eq!(updates.len(), 1);

        let (matching, changes) = &updates[0];
        assert_eq!(
            matching,
            &AttributeMap::new()
                .with(attr::CLASS, "genp")
                .with(attr::ACCOUNT, "com.example")
        );
        let written: Value = codec::decode_record(changes).unwrap();
        assert_eq!(written, json!({"name": "changed"}));
    }
}
