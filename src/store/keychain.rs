// Keystash — Vault-backed secure store
//
// Implements the four `SecureStore` primitives on top of the SQLCipher vault.
// Each row holds one item: its class, the attribute set that scopes it, the
// value blob and two timestamps. Two items are duplicates only when class
// and attribute set are identical.
//
// SECURITY: value blobs are never logged. Database failures are logged and
// reported to the caller as `Status::IO`.

use chrono::Utc;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};

use crate::item::{attr, AttributeMap, AttributeValue, ItemClass, SecureStore, Status, StoreResult};

use super::db::Vault;
use super::schema;

/// Largest value blob the vault accepts.
pub const MAX_VALUE_LEN: usize = 1 << 20;

struct ItemRow {
    id: i64,
    attributes: AttributeMap,
    value: Option<Vec<u8>>,
    created_at: String,
    updated_at: String,
}

impl ItemRow {
    fn matches(&self, query: &AttributeMap) -> bool {
        query.iter().all(|(name, value)| {
            if name == attr::CLASS || schema::is_return_flag(name) {
                true
            } else if name == attr::VALUE_DATA {
                value.as_data().is_some() && value.as_data() == self.value.as_deref()
            } else if name == attr::CREATION_DATE {
                value.as_str() == Some(self.created_at.as_str())
            } else if name == attr::MODIFICATION_DATE {
                value.as_str() == Some(self.updated_at.as_str())
            } else {
                self.attributes.get(name) == Some(value)
            }
        })
    }
}

fn db_failure(e: rusqlite::Error) -> Status {
    tracing::error!(error = %e, "Vault query failed");
    Status::IO
}

/// Resolve and check the class a query or payload targets.
fn class_of(attributes: &AttributeMap) -> StoreResult<ItemClass> {
    attributes
        .get(attr::CLASS)
        .and_then(AttributeValue::as_str)
        .and_then(ItemClass::from_native)
        .ok_or(Status::PARAM)
}

fn validate(class: ItemClass, attributes: &AttributeMap) -> StoreResult<()> {
    match attributes.iter().find(|(name, _)| !schema::is_valid_for(class, name)) {
        Some((name, _)) => {
            tracing::debug!(class = %class, attribute = %name, "Attribute not valid for class");
            Err(Status::NO_SUCH_ATTR)
        }
        None => Ok(()),
    }
}

/// Check a payload about to be written and split off its value blob.
fn writable_value(attributes: &AttributeMap) -> StoreResult<Option<Vec<u8>>> {
    if attributes.iter().any(|(name, _)| schema::is_read_only(name)) {
        return Err(Status::PARAM);
    }
    match attributes.get(attr::VALUE_DATA) {
        None => Ok(None),
        Some(AttributeValue::Data(bytes)) if bytes.len() > MAX_VALUE_LEN => {
            Err(Status::DATA_TOO_LARGE)
        }
        Some(AttributeValue::Data(bytes)) => Ok(Some(bytes.clone())),
        Some(_) => Err(Status::PARAM),
    }
}

/// The attributes a row persists: everything but class, value and flags.
fn stored_attributes(attributes: &AttributeMap) -> AttributeMap {
    attributes
        .iter()
        .filter(|(name, _)| {
            *name != attr::CLASS && *name != attr::VALUE_DATA && !schema::is_return_flag(name)
        })
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

fn flag(query: &AttributeMap, name: &str) -> StoreResult<bool> {
    match query.get(name) {
        None => Ok(false),
        Some(AttributeValue::Bool(b)) => Ok(*b),
        Some(_) => Err(Status::PARAM),
    }
}

fn to_json(attributes: &AttributeMap) -> StoreResult<String> {
    serde_json::to_string(attributes).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize item attributes");
        Status::DECODE
    })
}

pub struct SqliteKeychain<'a> {
    vault: &'a Vault,
}

/// Check a query and resolve the class it targets.
fn query_class(query: &AttributeMap) -> StoreResult<ItemClass> {
    let class = class_of(query)?;
    validate(class, query)?;
    if let Some(value) = query.get(attr::VALUE_DATA) {
        if value.as_data().is_none() {
            return Err(Status::PARAM);
        }
    }
    Ok(class)
}

fn load(conn: &Connection, class: ItemClass) -> StoreResult<Vec<ItemRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, attributes, value_data, created_at, updated_at
             FROM items WHERE class = ?1 ORDER BY id ASC",
        )
        .map_err(db_failure)?;

    let rows = stmt
        .query_map(params![class.native()], |row| {
            let id: i64 = row.get(0)?;
            let attributes: String = row.get(1)?;
            let value: Option<Vec<u8>> = row.get(2)?;
            let created_at: String = row.get(3)?;
            let updated_at: String = row.get(4)?;
            Ok((id, attributes, value, created_at, updated_at))
        })
        .map_err(db_failure)?;

    let mut items = Vec::new();
    for row in rows {
        let (id, attributes_json, value, created_at, updated_at) = row.map_err(db_failure)?;
        let attributes: AttributeMap = serde_json::from_str(&attributes_json).map_err(|e| {
            tracing::error!(item_id = id, error = %e, "Stored attributes are corrupt");
            Status::DECODE
        })?;
        items.push(ItemRow {
            id,
            attributes,
            value,
            created_at,
            updated_at,
        });
    }

    Ok(items)
}

/// Take the write lock up front so the rows read inside the transaction
/// cannot change before its writes commit.
fn begin_write(conn: &Connection) -> StoreResult<Transaction<'_>> {
    Transaction::new_unchecked(conn, TransactionBehavior::Immediate).map_err(db_failure)
}

impl<'a> SqliteKeychain<'a> {
    pub fn new(vault: &'a Vault) -> Self {
        Self { vault }
    }
}

impl<'a> SecureStore for SqliteKeychain<'a> {
    fn copy_matching(&self, query: &AttributeMap) -> StoreResult<AttributeMap> {
        let want_attributes = flag(query, attr::RETURN_ATTRIBUTES)?;
        let want_data = flag(query, attr::RETURN_DATA)?;

        let class = query_class(query)?;
        let row = load(self.vault.conn(), class)?
            .into_iter()
            .find(|row| row.matches(query))
            .ok_or(Status::ITEM_NOT_FOUND)?;

        let mut record = AttributeMap::new();
        if want_attributes {
            record = row
                .attributes
                .with(attr::CLASS, class.native())
                .with(attr::CREATION_DATE, row.created_at)
                .with(attr::MODIFICATION_DATE, row.updated_at);
        }
        if want_data {
            if let Some(value) = row.value {
                record.insert(attr::VALUE_DATA, value);
            }
        }
        Ok(record)
    }

    fn add(&self, attributes: &AttributeMap) -> StoreResult<()> {
        let class = class_of(attributes)?;
        validate(class, attributes)?;
        let value = writable_value(attributes)?;
        let stored = stored_attributes(attributes);

        let tx = begin_write(self.vault.conn())?;
        if load(&tx, class)?.iter().any(|row| row.attributes == stored) {
            return Err(Status::DUPLICATE_ITEM);
        }

        let now = Utc::now().to_rfc3339();
        tx.execute(
            "INSERT INTO items (class, attributes, value_data, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![class.native(), to_json(&stored)?, value, now, now],
        )
        .map_err(db_failure)?;
        tx.commit().map_err(db_failure)?;

        tracing::debug!(class = %class, "Vault item added");
        Ok(())
    }

    fn update(&self, query: &AttributeMap, changes: &AttributeMap) -> StoreResult<()> {
        let class = query_class(query)?;
        if changes.contains(attr::CLASS) {
            return Err(Status::PARAM);
        }
        validate(class, changes)?;
        let new_value = writable_value(changes)?;
        let new_attributes = stored_attributes(changes);

        let tx = begin_write(self.vault.conn())?;
        let (rows, others): (Vec<ItemRow>, Vec<ItemRow>) =
            load(&tx, class)?.into_iter().partition(|row| row.matches(query));
        if rows.is_empty() {
            return Err(Status::ITEM_NOT_FOUND);
        }

        let merged: Vec<AttributeMap> = rows
            .iter()
            .map(|row| row.attributes.clone().merged_with(Some(&new_attributes)))
            .collect();

        // An unchanged attribute set cannot collide: the rows were distinct.
        if !new_attributes.is_empty() {
            let collides = merged.iter().enumerate().any(|(i, attributes)| {
                others.iter().any(|row| row.attributes == *attributes)
                    || merged[i + 1..].contains(attributes)
            });
            if collides {
                tracing::debug!(class = %class, "Update would duplicate an existing item");
                return Err(Status::DUPLICATE_ITEM);
            }
        }

        let now = Utc::now().to_rfc3339();
        for (row, attributes) in rows.iter().zip(&merged) {
            let value = new_value.as_ref().or(row.value.as_ref());
            tx.execute(
                "UPDATE items SET attributes = ?1, value_data = ?2, updated_at = ?3 WHERE id = ?4",
                params![to_json(attributes)?, value, now, row.id],
            )
            .map_err(db_failure)?;
        }
        tx.commit().map_err(db_failure)?;

        tracing::debug!(class = %class, count = rows.len(), "Vault items updated");
        Ok(())
    }

    fn delete(&self, query: &AttributeMap) -> StoreResult<()> {
        let class = query_class(query)?;

        let tx = begin_write(self.vault.conn())?;
        let ids: Vec<i64> = load(&tx, class)?
            .into_iter()
            .filter(|row| row.matches(query))
            .map(|row| row.id)
            .collect();
        if ids.is_empty() {
            return Err(Status::ITEM_NOT_FOUND);
        }

        for id in &ids {
            tx.execute("DELETE FROM items WHERE id = ?1", params![id])
                .map_err(db_failure)?;
        }
        tx.commit().map_err(db_failure)?;

        tracing::debug!(class = %class, count = ids.len(), "Vault items deleted");
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
