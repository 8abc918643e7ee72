//! Ledger persistence on top of a [`BlobStore`].
//!
//! Best effort by contract: failures are logged and swallowed here. Reads
//! degrade to "no data", writes are dropped, and the in-memory ledger never
//! hears about either.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::sync::Mutex;

use brewledger_events::LedgerEntry;
use brewledger_inventory::InventorySnapshot;

use crate::blob_store::{BlobStore, StoreError};

pub const ENTRIES_KEY: &str = "ledger_entries";
pub const SNAPSHOTS_KEY: &str = "inventory_snapshots";

/// Keys used by the older mobile build. Read only when the current key is absent.
pub const LEGACY_ENTRIES_KEY: &str = "@fap_transactions";
pub const LEGACY_SNAPSHOTS_KEY: &str = "@fap_stock_history";

/// Field names only the older build wrote on entries.
const LEGACY_ENTRY_FIELDS: [&str; 2] = ["type", "costPerUnit"];

/// Reads and writes the entry list and the snapshot sequence as JSON arrays.
#[derive(Debug)]
pub struct LedgerStore<S> {
    store: S,
    next_generation: AtomicU64,
    /// Generation of the last completed write; guards write ordering.
    written: Mutex<u64>,
}

impl<S> LedgerStore<S>
where
    S: BlobStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            next_generation: AtomicU64::new(0),
            written: Mutex::new(0),
        }
    }

    pub fn blob_store(&self) -> &S {
        &self.store
    }

    /// Stored entries in append order; empty on first run or on any failure.
    ///
    /// The older build kept its list newest first. Such data (found under the
    /// legacy key, or carrying legacy field names) is reversed into append
    /// order before it is returned.
    pub async fn load_entries(&self) -> Vec<LedgerEntry> {
        let (mut values, from_legacy_key) = match self.read_values(ENTRIES_KEY).await {
            Some(values) => (values, false),
            None => match self.read_values(LEGACY_ENTRIES_KEY).await {
                Some(values) => (values, true),
                None => return Vec::new(),
            },
        };

        if from_legacy_key || values.iter().any(is_legacy_entry) {
            tracing::info!(
                from_legacy_key,
                records = values.len(),
                "legacy newest-first entries; restoring append order"
            );
            values.reverse();
        }
        decode_records(ENTRIES_KEY, values)
    }

    /// Stored snapshot sequence; empty on first run or on any failure.
    ///
    /// Snapshots were always appended, so legacy ones keep their order.
    pub async fn load_snapshots(&self) -> Vec<InventorySnapshot> {
        let values = match self.read_values(SNAPSHOTS_KEY).await {
            Some(values) => values,
            None => self
                .read_values(LEGACY_SNAPSHOTS_KEY)
                .await
                .unwrap_or_default(),
        };
        decode_records(SNAPSHOTS_KEY, values)
    }

    /// Reserve a write slot. Callers that defer the actual write (spawned
    /// tasks) take the generation synchronously so writes land in order.
    pub fn next_generation(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Persist both collections now.
    pub async fn save_all(&self, entries: &[LedgerEntry], snapshots: &[InventorySnapshot]) {
        let generation = self.next_generation();
        self.save_generation(generation, entries, snapshots).await;
    }

    /// Persist both collections unless a newer generation already landed.
    ///
    /// Returns whether this call wrote anything.
    pub async fn save_generation(
        &self,
        generation: u64,
        entries: &[LedgerEntry],
        snapshots: &[InventorySnapshot],
    ) -> bool {
        let mut written = self.written.lock().await;
        if generation <= *written {
            tracing::debug!(generation, latest = *written, "skipping stale ledger write");
            return false;
        }

        match self.try_save(entries, snapshots).await {
            Ok(()) => {
                tracing::debug!(
                    generation,
                    entries = entries.len(),
                    snapshots = snapshots.len(),
                    "ledger saved"
                );
            }
            Err(err) => {
                tracing::error!(generation, %err, "failed to save ledger; changes kept in memory only");
            }
        }
        *written = generation;
        true
    }

    async fn try_save(
        &self,
        entries: &[LedgerEntry],
        snapshots: &[InventorySnapshot],
    ) -> Result<(), StoreError> {
        let entries_json = to_json_array(entries)?;
        let snapshots_json = to_json_array(snapshots)?;

        let (entries_res, snapshots_res) = tokio::join!(
            self.store.set(ENTRIES_KEY, entries_json),
            self.store.set(SNAPSHOTS_KEY, snapshots_json),
        );
        entries_res?;
        snapshots_res?;
        Ok(())
    }

    /// Raw array under `key`. `None` only when the key was never written;
    /// unreadable blobs come back as an empty array.
    async fn read_values(&self, key: &str) -> Option<Vec<JsonValue>> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(%key, %err, "failed to read blob; starting empty");
                return Some(Vec::new());
            }
        };

        match serde_json::from_str(&raw) {
            Ok(values) => Some(values),
            Err(err) => {
                tracing::warn!(%key, %err, "blob is not a JSON array; starting empty");
                Some(Vec::new())
            }
        }
    }
}

fn is_legacy_entry(value: &JsonValue) -> bool {
    LEGACY_ENTRY_FIELDS.iter().any(|field| value.get(*field).is_some())
}

fn decode_records<T>(key: &str, values: Vec<JsonValue>) -> Vec<T>
where
    T: DeserializeOwned,
{
    let total = values.len();
    let records: Vec<T> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(%key, index, %err, "dropping unreadable record");
                None
            }
        })
        .collect();

    if records.len() != total {
        tracing::warn!(%key, kept = records.len(), total, "some stored records were dropped");
    }
    records
}

fn to_json_array<T: Serialize>(items: &[T]) -> Result<String, StoreError> {
    Ok(serde_json::to_string(items)?)
}
