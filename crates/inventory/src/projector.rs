//! Inventory trajectory projection.
//!
//! Each product sale lowers the most recent known stock level by the sold
//! quantity, floored at zero. Nothing else moves stock: restocking is not
//! modeled, so purchases and gathered material leave the trajectory alone.

use serde::{Deserialize, Serialize};

use brewledger_core::Timestamp;
use brewledger_events::{EntryKind, LedgerEntry, Projection};

/// Finished-product stock level as of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: Timestamp,
    #[serde(alias = "potions")]
    pub level: u32,
}

/// Ordered snapshot sequence, one per applied sale.
///
/// The order is the order sales were applied, not timestamp order: an edit
/// can move a sale's timestamp without moving its snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryProjector {
    snapshots: Vec<InventorySnapshot>,
}

impl InventoryProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a previously persisted sequence.
    pub fn from_snapshots(snapshots: Vec<InventorySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Build the trajectory by replaying `entries` in append order.
    pub fn replay<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
    {
        brewledger_events::replay(entries)
    }

    pub fn snapshots(&self) -> &[InventorySnapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Level of the last snapshot, or 0 before any sale.
    pub fn current_level(&self) -> u32 {
        self.snapshots.last().map(|s| s.level).unwrap_or(0)
    }

    /// Apply one entry; returns the snapshot it appended, if any.
    pub fn record(&mut self, entry: &LedgerEntry) -> Option<InventorySnapshot> {
        match entry.kind() {
            EntryKind::ProductSale => {
                let snapshot = InventorySnapshot {
                    timestamp: entry.timestamp(),
                    level: self.current_level().saturating_sub(entry.quantity()),
                };
                self.snapshots.push(snapshot);
                Some(snapshot)
            }
            EntryKind::MaterialPurchase | EntryKind::MaterialGathered | EntryKind::ComponentPurchase => {
                None
            }
        }
    }
}

impl Projection for InventoryProjector {
    fn apply(&mut self, entry: &LedgerEntry) {
        self.record(entry);
    }

    fn reset(&mut self) {
        self.snapshots.clear();
    }
}
