//! Tracker configuration loaded from environment variables.
//!
//! Every setting has a default; a malformed value logs a warning and falls
//! back to the default instead of failing startup.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use brewledger_inventory::SnapshotPolicy;

use crate::blob_store::{BlobStore, FileBlobStore, InMemoryBlobStore};

pub const DATA_DIR_VAR: &str = "BREWLEDGER_DATA_DIR";
pub const STORE_VAR: &str = "BREWLEDGER_STORE";
pub const SNAPSHOT_POLICY_VAR: &str = "BREWLEDGER_SNAPSHOT_POLICY";

const APP_DIR: &str = "brewledger";
const FALLBACK_DATA_DIR: &str = ".brewledger";

/// Which blob store backs the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreBackend {
    #[default]
    File,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StoreBackend::File),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Directory holding the JSON blobs (file backend only).
    pub data_dir: PathBuf,
    pub store: StoreBackend,
    pub snapshot_policy: SnapshotPolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            store: StoreBackend::default(),
            snapshot_policy: SnapshotPolicy::default(),
        }
    }
}

impl TrackerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        Self {
            data_dir,
            store: parse_var(&lookup, STORE_VAR),
            snapshot_policy: parse_var(&lookup, SNAPSHOT_POLICY_VAR),
        }
    }

    /// Open the configured blob store.
    pub fn blob_store(&self) -> Arc<dyn BlobStore> {
        match self.store {
            StoreBackend::File => Arc::new(FileBlobStore::new(self.data_dir.clone())),
            StoreBackend::Memory => Arc::new(InMemoryBlobStore::new()),
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Default,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => T::default(),
        Some(raw) => raw.parse().unwrap_or_else(|err| {
            tracing::warn!(%key, value = %raw, %err, "ignoring invalid configuration value");
            T::default()
        }),
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> TrackerConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TrackerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config(&[]);
        assert_eq!(cfg.store, StoreBackend::File);
        assert_eq!(cfg.snapshot_policy, SnapshotPolicy::Replay);
        assert_eq!(cfg.data_dir, default_data_dir());
    }

    #[test]
    fn reads_every_variable() {
        let cfg = config(&[
            (DATA_DIR_VAR, "/tmp/ledger"),
            (STORE_VAR, "Memory"),
            (SNAPSHOT_POLICY_VAR, "append_only"),
        ]);
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/ledger"));
        assert_eq!(cfg.store, StoreBackend::Memory);
        assert_eq!(cfg.snapshot_policy, SnapshotPolicy::AppendOnly);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let cfg = config(&[(STORE_VAR, "postgres"), (SNAPSHOT_POLICY_VAR, "lazy")]);
        assert_eq!(cfg.store, StoreBackend::File);
        assert_eq!(cfg.snapshot_policy, SnapshotPolicy::Replay);
    }
}
