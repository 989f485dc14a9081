// Keystash — Item error taxonomy

use thiserror::Error;

use super::secure_store::Status;

/// Every failure an item operation can surface. Native store statuses are
/// mapped into this set exactly once, where the primitive call returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ItemError {
    #[error("Invalid item data")]
    InvalidData,

    #[error("Item not found")]
    ItemNotFound,

    #[error("Duplicate item")]
    DuplicateItem,

    #[error("Attribute is not valid for this item class")]
    IncorrectAttributeForClass,

    #[error("Unexpected store status: {0}")]
    Unexpected(i32),
}

impl From<Status> for ItemError {
    fn from(status: Status) -> Self {
        match status {
            Status::ITEM_NOT_FOUND => ItemError::ItemNotFound,
            Status::DUPLICATE_ITEM => ItemError::DuplicateItem,
            Status::DATA_TOO_LARGE => ItemError::InvalidData,
            Status::NO_SUCH_ATTR => ItemError::IncorrectAttributeForClass,
            other => ItemError::Unexpected(other.code()),
        }
    }
}

pub type ItemResult<T> = std::result::Result<T, ItemError>;

// ─── Tests ───────────────────────────────────────────────────────────────────
