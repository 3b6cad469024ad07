//! Durable key-value storage backing the persisted stores.
//!
//! Access is synchronous: every write completes (or fails) before the store
//! that issued it notifies its subscribers. Values are opaque strings; the
//! stores put JSON in them.
//!
//! # Backends
//!
//! - [`FileStorage`] - one `<key>.json` file per key in a state directory
//! - [`MemoryStorage`] - process-local map, for tests and embedding
//! - [`NoopStorage`] - no durable storage available; writes are discarded

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::{MemoryStorage, NoopStorage};

use thiserror::Error;

/// Errors that can occur when reading or writing durable storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key contains characters outside `[A-Za-z0-9_-]` or is empty.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Underlying filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A synchronous string key-value store.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Check that `key` is usable as a storage key on every backend.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("auth_token").is_ok());
        assert!(validate_key("cart-v2").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("with space").is_err());
    }
}
