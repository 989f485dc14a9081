// Keystash — Query builders
//
// Each store call gets a base attribute set for its operation; caller extras
// are merged over the base and win every collision, `class`, `acct` and
// `v_Data` included. Nothing here guards against an extra rerouting a query.

use super::attributes::{attr, AttributeMap};
use super::class::ItemClass;

fn identity(class: ItemClass, key: &str) -> AttributeMap {
    AttributeMap::new()
        .with(attr::CLASS, class.native())
        .with(attr::ACCOUNT, key)
}

/// Lookup that asks for both the record's attributes and its value data.
pub fn build_read_query(class: ItemClass, key: &str, extra: Option<&AttributeMap>) -> AttributeMap {
    identity(class, key)
        .with(attr::RETURN_ATTRIBUTES, true)
        .with(attr::RETURN_DATA, true)
        .merged_with(extra)
}

/// Full payload for creating an item.
pub fn build_write_query(
    class: ItemClass,
    key: &str,
    value: Vec<u8>,
    extra: Option<&AttributeMap>,
) -> AttributeMap {
    identity(class, key)
        .with(attr::VALUE_DATA, value)
        .merged_with(extra)
}

/// Locates an item without requesting anything back.
pub fn build_match_query(class: ItemClass, key: &str, extra: Option<&AttributeMap>) -> AttributeMap {
    identity(class, key).merged_with(extra)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
