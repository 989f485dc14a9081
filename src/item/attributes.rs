// Keystash — Attribute maps
//
// The currency exchanged with a secure store: queries, write payloads and
// returned records are all mappings from native attribute name to value.
//
// SECURITY: `Data` values hold encoded secrets. Their Debug output is
// redacted so a logged query never leaks the payload.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Native attribute names understood by the store.
pub mod attr {
    /// Item class constant (`genp`, `cert`, ...).
    pub const CLASS: &str = "class";
    /// Account attribute; carries the item key.
    pub const ACCOUNT: &str = "acct";
    pub const SERVICE: &str = "svce";
    pub const LABEL: &str = "labl";
    pub const DESCRIPTION: &str = "desc";
    pub const ACCESS_GROUP: &str = "agrp";
    pub const GENERIC: &str = "gena";
    pub const CREATION_DATE: &str = "cdat";
    pub const MODIFICATION_DATE: &str = "mdat";

    pub const CERTIFICATE_TYPE: &str = "ctyp";
    pub const ISSUER: &str = "issr";
    pub const SERIAL_NUMBER: &str = "slnr";

    pub const KEY_CLASS: &str = "kcls";
    pub const APPLICATION_LABEL: &str = "klbl";
    pub const KEY_TYPE: &str = "type";
    pub const KEY_SIZE: &str = "bsiz";

    /// Ask the store to return the matched record's attributes.
    pub const RETURN_ATTRIBUTES: &str = "r_Attributes";
    /// Ask the store to return the matched record's value data.
    pub const RETURN_DATA: &str = "r_Data";
    /// The binary payload of an item.
    pub const VALUE_DATA: &str = "v_Data";
}

/// A single attribute value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    Bool(bool),
    Integer(i64),
    String(String),
    Data(Vec<u8>),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&[u8]> {
        match self {
            AttributeValue::Data(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Debug for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(b) => write!(f, "Bool({})", b),
            AttributeValue::Integer(i) => write!(f, "Integer({})", i),
            AttributeValue::String(s) => write!(f, "String({:?})", s),
            AttributeValue::Data(bytes) => write!(f, "Data([REDACTED; {} bytes])", bytes.len()),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(value: Vec<u8>) -> Self {
        AttributeValue::Data(value)
    }
}

impl From<&[u8]> for AttributeValue {
    fn from(value: &[u8]) -> Self {
        AttributeValue::Data(value.to_vec())
    }
}

/// Mapping from attribute name to value. Ordering carries no meaning; a
/// `BTreeMap` only keeps Debug output and serialized forms deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeMap(BTreeMap<String, AttributeValue>);

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute, returning the value it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.0.insert(name.into(), value.into())
    }

    /// Builder-style `insert`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Merge `extra` over `self`. Every attribute in `extra` overwrites the
    /// attribute of the same name in `self`, whatever that attribute is.
    pub fn merged_with(mut self, extra: Option<&AttributeMap>) -> Self {
        if let Some(extra) = extra {
            for (name, value) in &extra.0 {
                self.0.insert(name.clone(), value.clone());
            }
        }
        self
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl IntoIterator for AttributeMap {
    type Item = (String, AttributeValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
