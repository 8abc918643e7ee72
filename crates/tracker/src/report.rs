//! Serializable dashboard summary.

use serde::Serialize;

use brewledger_accounting::{Statistics, display_total};
use brewledger_core::{Timestamp, format_date};
use brewledger_events::{EntryKind, LedgerEntry};
use brewledger_inventory::InventorySnapshot;

use crate::state::LedgerState;

/// One line of the transaction list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRow {
    pub id: String,
    pub kind: EntryKind,
    pub label: &'static str,
    pub date: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: Timestamp,
    pub quantity: u32,
    pub unit_price: f64,
    pub total: f64,
    /// Whether `total` already has the marketplace tax taken out.
    pub after_tax: bool,
}

impl From<&LedgerEntry> for EntryRow {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            id: entry.id().to_string(),
            kind: entry.kind(),
            label: entry.kind().label(),
            date: format_date(entry.timestamp()),
            timestamp: entry.timestamp(),
            quantity: entry.quantity(),
            unit_price: entry.unit_price(),
            total: display_total(entry),
            after_tax: entry.kind().is_sale(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub statistics: Statistics,
    pub total_spend: f64,
    pub current_stock: u32,
    pub stock_history: Vec<InventorySnapshot>,
    /// Newest first.
    pub entries: Vec<EntryRow>,
}

impl DashboardReport {
    pub fn from_state(state: &LedgerState) -> Self {
        let statistics = state.statistics();
        Self {
            statistics,
            total_spend: statistics.total_spend(),
            current_stock: state.current_level(),
            stock_history: state.snapshots().to_vec(),
            entries: state.entries_newest_first().map(EntryRow::from).collect(),
        }
    }
}
