//! Ledger state bound to persistence.
//!
//! Every mutation follows the same loop: change the entry list, recompute the
//! derived views, then hand a copy of both collections to the store. Saving is
//! fire-and-forget; the caller never waits on or hears about storage.

use std::sync::Arc;

use chrono::Utc;

use brewledger_accounting::Statistics;
use brewledger_core::{DomainResult, EntryId};
use brewledger_events::{EntryDraft, LedgerEntry};
use brewledger_infra::{BlobStore, LedgerStore};
use brewledger_inventory::SnapshotPolicy;

use crate::report::DashboardReport;
use crate::state::LedgerState;

pub struct LedgerSession<S>
where
    S: BlobStore + 'static,
{
    state: LedgerState,
    store: Arc<LedgerStore<S>>,
}

impl<S> LedgerSession<S>
where
    S: BlobStore + 'static,
{
    /// Load whatever the store holds (nothing, on first run) and rebuild state.
    pub async fn open(store: Arc<LedgerStore<S>>, policy: SnapshotPolicy) -> Self {
        let (entries, snapshots) = tokio::join!(store.load_entries(), store.load_snapshots());
        tracing::info!(
            entries = entries.len(),
            snapshots = snapshots.len(),
            policy = policy.as_str(),
            "ledger loaded"
        );
        let state = LedgerState::restore(entries, snapshots, policy);
        Self { state, store }
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn store(&self) -> &Arc<LedgerStore<S>> {
        &self.store
    }

    /// Record a new entry. Input that fails validation leaves the ledger
    /// untouched and nothing is persisted.
    pub fn record(&mut self, draft: EntryDraft) -> DomainResult<LedgerEntry> {
        let entry = draft.into_entry(EntryId::generate(), Utc::now())?;
        self.state.append(entry.clone())?;
        self.persist();
        Ok(entry)
    }

    /// Replace an existing entry. Unknown ids are a silent no-op.
    pub fn amend(&mut self, entry: LedgerEntry) -> DomainResult<bool> {
        let changed = self.state.amend(entry)?;
        if changed {
            self.persist();
        }
        Ok(changed)
    }

    /// Delete an entry. Unknown ids are a silent no-op.
    pub fn remove(&mut self, id: &EntryId) -> bool {
        let removed = self.state.remove(id);
        if removed {
            self.persist();
        }
        removed
    }

    pub fn statistics(&self) -> Statistics {
        self.state.statistics()
    }

    pub fn report(&self) -> DashboardReport {
        DashboardReport::from_state(&self.state)
    }

    /// Write the current state and wait for it. Any spawned save still in
    /// flight becomes stale and is skipped.
    pub async fn flush(&self) {
        self.store
            .save_all(self.state.entries(), self.state.snapshots())
            .await;
    }

    fn persist(&self) {
        // Generation is taken here, in mutation order, not when the task runs.
        let generation = self.store.next_generation();
        let entries = self.state.entries().to_vec();
        let snapshots = self.state.snapshots().to_vec();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let store = Arc::clone(&self.store);
                handle.spawn(async move {
                    store.save_generation(generation, &entries, &snapshots).await;
                });
            }
            Err(_) => {
                tracing::warn!(generation, "no async runtime; change kept in memory only");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewledger_events::EntryKind;
    use brewledger_infra::InMemoryBlobStore;

    type MemorySession = LedgerSession<InMemoryBlobStore>;

    async fn open(policy: SnapshotPolicy) -> (MemorySession, Arc<LedgerStore<InMemoryBlobStore>>) {
        let store = Arc::new(LedgerStore::new(InMemoryBlobStore::new()));
        let session = LedgerSession::open(Arc::clone(&store), policy).await;
        (session, store)
    }

    /// Yield until the spawned save has written `expected` entries.
    async fn wait_for_entries(store: &LedgerStore<InMemoryBlobStore>, expected: usize) -> Vec<LedgerEntry> {
        for _ in 0..1_000 {
            let entries = store.load_entries().await;
            if entries.len() == expected {
                return entries;
            }
            tokio::task::yield_now().await;
        }
        panic!("save never landed");
    }

    #[tokio::test]
    async fn record_persists_in_background() {
        let (mut session, store) = open(SnapshotPolicy::Replay).await;
        let entry = session
            .record(EntryDraft::new(EntryKind::MaterialPurchase, 40, 10.0))
            .unwrap();

        let stored = wait_for_entries(&store, 1).await;
        assert_eq!(stored[0], entry);
    }

    #[tokio::test]
    async fn invalid_draft_changes_nothing() {
        let (mut session, store) = open(SnapshotPolicy::Replay).await;
        let err = session.record(EntryDraft::new(EntryKind::ProductSale, 0, 44.0));
        assert!(err.is_err());
        assert!(session.state().is_empty());

        session.flush().await;
        assert!(store.load_entries().await.is_empty());
    }

    #[tokio::test]
    async fn remove_and_amend_persist() {
        let (mut session, store) = open(SnapshotPolicy::Replay).await;
        let a = session.record(EntryDraft::new(EntryKind::ProductSale, 1, 44.0)).unwrap();
        let b = session.record(EntryDraft::new(EntryKind::ProductSale, 2, 44.0)).unwrap();

        assert!(session.remove(a.id()));
        let bigger = LedgerEntry::new(b.id().clone(), b.kind(), 5, 50.0, b.timestamp()).unwrap();
        assert!(session.amend(bigger.clone()).unwrap());

        session.flush().await;
        assert_eq!(store.load_entries().await, vec![bigger]);
        assert_eq!(store.load_snapshots().await.len(), 1);
    }

    #[tokio::test]
    async fn unknown_ids_do_not_write() {
        let (mut session, store) = open(SnapshotPolicy::Replay).await;
        let ghost: EntryId = "ghost".parse().unwrap();
        assert!(!session.remove(&ghost));
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(store.blob_store().is_empty().await);
    }

    #[tokio::test]
    async fn reopen_restores_state() {
        let (mut session, store) = open(SnapshotPolicy::Replay).await;
        session.record(EntryDraft::new(EntryKind::ProductSale, 3, 44.0)).unwrap();
        session.record(EntryDraft::new(EntryKind::ComponentPurchase, 10, 4.0)).unwrap();
        session.flush().await;

        let reopened = LedgerSession::open(Arc::clone(&store), SnapshotPolicy::Replay).await;
        assert_eq!(reopened.state().entries(), session.state().entries());
        assert_eq!(reopened.state().snapshots(), session.state().snapshots());
        assert_eq!(reopened.statistics(), session.statistics());
    }

    #[test]
    fn mutations_without_runtime_stay_in_memory() {
        let store = Arc::new(LedgerStore::new(InMemoryBlobStore::new()));
        let mut session = LedgerSession {
            state: LedgerState::default(),
            store,
        };
        session.record(EntryDraft::new(EntryKind::MaterialGathered, 8, 0.0)).unwrap();
        assert_eq!(session.state().len(), 1);
    }
}
