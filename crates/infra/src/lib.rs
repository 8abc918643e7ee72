//! Infrastructure layer: blob storage, ledger persistence, configuration.

pub mod blob_store;
pub mod config;
pub mod ledger_store;

pub use blob_store::{BlobStore, FileBlobStore, InMemoryBlobStore, StoreError};
pub use config::{StoreBackend, TrackerConfig};
pub use ledger_store::{
    ENTRIES_KEY, LEGACY_ENTRIES_KEY, LEGACY_SNAPSHOTS_KEY, LedgerStore, SNAPSHOTS_KEY,
};
