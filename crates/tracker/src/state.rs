//! In-memory ledger state.
//!
//! The entry list is the single source of truth. The inventory trajectory is
//! derived from it: appended to on new sales, replayed from empty on edits and
//! deletions (under [`SnapshotPolicy::Replay`]). Statistics are never cached.

use brewledger_accounting::{LedgerAggregator, Statistics};
use brewledger_core::{Aggregate, DomainError, DomainResult, EntryId};
use brewledger_events::{Event, LedgerEntry, Projection};
use brewledger_inventory::{InventoryProjector, InventorySnapshot, SnapshotPolicy};

/// Command: record a new entry (id already assigned by the caller).
#[derive(Debug, Clone, PartialEq)]
pub struct RecordEntry {
    pub entry: LedgerEntry,
}

/// Command: replace the entry with the same id.
#[derive(Debug, Clone, PartialEq)]
pub struct AmendEntry {
    pub entry: LedgerEntry,
}

/// Command: delete an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveEntry {
    pub id: EntryId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    Record(RecordEntry),
    Amend(AmendEntry),
    Remove(RemoveEntry),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerChange {
    EntryRecorded(LedgerEntry),
    EntryAmended {
        previous: LedgerEntry,
        current: LedgerEntry,
    },
    EntryRemoved(LedgerEntry),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerState {
    entries: Vec<LedgerEntry>,
    projector: InventoryProjector,
    policy: SnapshotPolicy,
    version: u64,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self::new(SnapshotPolicy::default())
    }
}

impl LedgerState {
    pub fn new(policy: SnapshotPolicy) -> Self {
        Self {
            entries: Vec::new(),
            projector: InventoryProjector::new(),
            policy,
            version: 0,
        }
    }

    /// Rebuild everything from an entry list in append order.
    pub fn from_entries(entries: Vec<LedgerEntry>, policy: SnapshotPolicy) -> Self {
        let projector = InventoryProjector::replay(&entries);
        Self {
            entries,
            projector,
            policy,
            version: 0,
        }
    }

    /// Restore from persisted collections.
    ///
    /// Under `Replay` the persisted snapshots are only compared against a fresh
    /// replay (drift is logged) and the replay wins. Under `AppendOnly` they
    /// are taken as-is.
    pub fn restore(
        entries: Vec<LedgerEntry>,
        snapshots: Vec<InventorySnapshot>,
        policy: SnapshotPolicy,
    ) -> Self {
        match policy {
            SnapshotPolicy::Replay => {
                let state = Self::from_entries(entries, policy);
                if state.projector.snapshots() != snapshots.as_slice() {
                    tracing::warn!(
                        persisted = snapshots.len(),
                        replayed = state.projector.len(),
                        "persisted inventory snapshots drifted from entries; using replay"
                    );
                }
                state
            }
            SnapshotPolicy::AppendOnly => Self {
                entries,
                projector: InventoryProjector::from_snapshots(snapshots),
                policy,
                version: 0,
            },
        }
    }

    pub fn policy(&self) -> SnapshotPolicy {
        self.policy
    }

    /// Entries in append order (oldest first).
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Entries as listings show them: most recently recorded first.
    pub fn entries_newest_first(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, id: &EntryId) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn snapshots(&self) -> &[InventorySnapshot] {
        self.projector.snapshots()
    }

    pub fn current_level(&self) -> u32 {
        self.projector.current_level()
    }

    pub fn statistics(&self) -> Statistics {
        LedgerAggregator::aggregate(&self.entries)
    }

    /// Discard the trajectory and replay it from the entries.
    pub fn rebuild(&mut self) {
        self.projector.rebuild(&self.entries);
    }

    pub fn append(&mut self, entry: LedgerEntry) -> DomainResult<()> {
        self.execute(&LedgerCommand::Record(RecordEntry { entry }))?;
        Ok(())
    }

    /// Replace an entry wholesale. Returns `false` when the id is unknown.
    pub fn amend(&mut self, entry: LedgerEntry) -> DomainResult<bool> {
        let changes = self.execute(&LedgerCommand::Amend(AmendEntry { entry }))?;
        Ok(!changes.is_empty())
    }

    /// Delete an entry. Returns `false` when the id is unknown.
    pub fn remove(&mut self, id: &EntryId) -> bool {
        let command = LedgerCommand::Remove(RemoveEntry { id: id.clone() });
        match self.execute(&command) {
            Ok(changes) => !changes.is_empty(),
            Err(_) => false,
        }
    }

    fn position(&self, id: &EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    fn recompute_after_mutation(&mut self) {
        if self.policy.recomputes_on_mutation() {
            self.rebuild();
        }
    }
}

impl Aggregate for LedgerState {
    type Command = LedgerCommand;
    type Change = LedgerChange;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, change: &Self::Change) {
        match change {
            LedgerChange::EntryRecorded(entry) => {
                tracing::debug!(entry_id = %entry.id(), event_type = entry.event_type(), "entry recorded");
                self.entries.push(entry.clone());
                self.projector.record(entry);
            }
            LedgerChange::EntryAmended { current, .. } => {
                tracing::debug!(entry_id = %current.id(), event_type = current.event_type(), "entry amended");
                if let Some(idx) = self.position(current.id()) {
                    self.entries[idx] = current.clone();
                }
                self.recompute_after_mutation();
            }
            LedgerChange::EntryRemoved(entry) => {
                tracing::debug!(entry_id = %entry.id(), event_type = entry.event_type(), "entry removed");
                self.entries.retain(|e| e.id() != entry.id());
                self.recompute_after_mutation();
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Change>, Self::Error> {
        match command {
            LedgerCommand::Record(cmd) => {
                if self.find(cmd.entry.id()).is_some() {
                    return Err(DomainError::invariant(format!(
                        "entry id {} already recorded",
                        cmd.entry.id()
                    )));
                }
                Ok(vec![LedgerChange::EntryRecorded(cmd.entry.clone())])
            }
            LedgerCommand::Amend(cmd) => Ok(self
                .find(cmd.entry.id())
                .map(|previous| LedgerChange::EntryAmended {
                    previous: previous.clone(),
                    current: cmd.entry.clone(),
                })
                .into_iter()
                .collect()),
            LedgerCommand::Remove(cmd) => Ok(self
                .find(&cmd.id)
                .map(|entry| LedgerChange::EntryRemoved(entry.clone()))
                .into_iter()
                .collect()),
        }
    }
}
