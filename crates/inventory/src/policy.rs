//! How the snapshot trajectory reacts to edits and deletions.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use brewledger_core::DomainError;

/// Snapshot maintenance policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotPolicy {
    /// Discard and replay the trajectory on every edit or delete, and rebuild
    /// it from entries on load. Keeps one snapshot per sale at all times.
    #[default]
    Replay,
    /// Only ever append on new sales; edits and deletes leave snapshots stale
    /// and persisted snapshots are trusted on load. Matches the behaviour of
    /// the older mobile build.
    AppendOnly,
}

impl SnapshotPolicy {
    pub fn recomputes_on_mutation(self) -> bool {
        match self {
            SnapshotPolicy::Replay => true,
            SnapshotPolicy::AppendOnly => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SnapshotPolicy::Replay => "replay",
            SnapshotPolicy::AppendOnly => "append_only",
        }
    }
}

impl FromStr for SnapshotPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replay" => Ok(SnapshotPolicy::Replay),
            "append_only" | "append-only" => Ok(SnapshotPolicy::AppendOnly),
            other => Err(DomainError::validation(format!("unknown snapshot policy '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_spellings() {
        assert_eq!("Replay".parse::<SnapshotPolicy>().unwrap(), SnapshotPolicy::Replay);
        assert_eq!("append-only".parse::<SnapshotPolicy>().unwrap(), SnapshotPolicy::AppendOnly);
        assert!("sometimes".parse::<SnapshotPolicy>().is_err());
    }

    #[test]
    fn replay_is_the_default() {
        assert_eq!(SnapshotPolicy::default(), SnapshotPolicy::Replay);
        assert!(SnapshotPolicy::default().recomputes_on_mutation());
    }
}
