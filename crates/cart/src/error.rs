//! Error types for the cart crate.
//!
//! None of these cross the `CartStore` operation boundary as a failure:
//! invalid items come back as `AddOutcome::Rejected`, and snapshot or
//! storage errors are logged and absorbed by the store.

use thiserror::Error;

/// Why an item could not be added to the cart
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidItem {
    #[error("item id is empty")]
    EmptyItemId,

    #[error("price {0:?} is not a finite number")]
    InvalidPrice(String),

    #[error("price {0} is outside the accepted range")]
    PriceOutOfRange(String),
}

/// Errors from the key-value store backing the cart
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O error while reading or writing a value
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key cannot be used with this store
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// A writer panicked while holding the store lock
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Errors decoding a persisted cart snapshot
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Malformed cart snapshot: {0}")]
    Malformed(String),

    #[error("Cart snapshot is not a list of lines (found {0})")]
    NotAList(&'static str),

    #[error("Unsupported cart snapshot version {0}")]
    UnsupportedVersion(u64),

    #[error("Failed to encode cart snapshot: {0}")]
    Encode(String),
}

/// Convenience alias for storage results
pub type StorageResult<T> = std::result::Result<T, StorageError>;
