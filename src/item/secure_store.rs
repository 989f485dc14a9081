// Keystash — Secure store seam
//
// The four primitives every backing store must provide. The item facade is
// written against this trait only, so any store (the SQLCipher vault, a
// platform keychain binding, an in-memory double) can sit underneath it.

use std::fmt;

use super::attributes::AttributeMap;

/// Native status code returned by a store primitive.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(i32);

impl Status {
    pub const IO: Status = Status(-36);
    pub const PARAM: Status = Status(-50);
    pub const DUPLICATE_ITEM: Status = Status(-25299);
    pub const ITEM_NOT_FOUND: Status = Status(-25300);
    pub const DATA_TOO_LARGE: Status = Status(-25302);
    pub const NO_SUCH_ATTR: Status = Status(-25303);
    pub const DECODE: Status = Status(-26275);

    pub const fn new(code: i32) -> Self {
        Status(code)
    }

    pub const fn code(self) -> i32 {
        self.0
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status({})", self.0)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of a primitive call; the error side is always a non-success status.
pub type StoreResult<T> = std::result::Result<T, Status>;

/// Abstraction over a keyed, attribute-indexed secure blob store.
pub trait SecureStore {
    /// Locate a single item. `r_Attributes` / `r_Data` in the query decide
    /// whether the returned record carries attributes and value data.
    fn copy_matching(&self, query: &AttributeMap) -> StoreResult<AttributeMap>;

    /// Create an item from a full attribute payload.
    fn add(&self, attributes: &AttributeMap) -> StoreResult<()>;

    /// Merge `changes` onto every item located by `query`.
    fn update(&self, query: &AttributeMap, changes: &AttributeMap) -> StoreResult<()>;

    /// Remove every item located by `query`.
    fn delete(&self, query: &AttributeMap) -> StoreResult<()>;
}

impl<S: SecureStore + ?Sized> SecureStore for &S {
    fn copy_matching(&self, query: &AttributeMap) -> StoreResult<AttributeMap> {
        (**self).copy_matching(query)
    }

    fn add(&self, attributes: &AttributeMap) -> StoreResult<()> {
        (**self).add(attributes)
    }

    fn update(&self, query: &AttributeMap, changes: &AttributeMap) -> StoreResult<()> {
        (**self).update(query, changes)
    }

    fn delete(&self, query: &AttributeMap) -> StoreResult<()> {
        (**self).delete(query)
    }
}

// ─── In-Memory Mock for Testing ──────────────────────────────────────────────
