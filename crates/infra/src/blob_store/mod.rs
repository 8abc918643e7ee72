//! Key-value blob storage for JSON documents.
//!
//! The store knows nothing about ledgers: it maps a short key to an opaque
//! JSON string. Absence of a key is `Ok(None)`, not an error.

pub mod file;
pub mod in_memory;

use std::sync::Arc;

use thiserror::Error;

pub use file::FileBlobStore;
pub use in_memory::InMemoryBlobStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Async get/set of JSON blobs.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Read the blob under `key`; `None` on first run.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the blob under `key`.
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<S> BlobStore for Arc<S>
where
    S: BlobStore + ?Sized,
{
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }
}

/// Keys become file names, so keep them to a portable alphabet. A single
/// leading `@` is allowed for the keys the older build used.
pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    let name = key.strip_prefix('@').unwrap_or(key);
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_alphabet() {
        assert!(validate_key("ledger_entries").is_ok());
        assert!(validate_key("v1.snapshots-2").is_ok());
        assert!(validate_key("@fap_transactions").is_ok());
        for bad in ["", "../etc", ".hidden", "a/b", "sp ace", "@", "@@x", "@.hidden", "a@b"] {
            assert!(validate_key(bad).is_err(), "{bad:?}");
        }
    }
}
