//! Ledger entries and the projection contract.
//!
//! Entries are the single source of truth; everything else (statistics, the
//! inventory trajectory) is a projection rebuilt by replaying them.

pub mod entry;
pub mod event;
pub mod input;
pub mod projection;

pub use entry::{EntryKind, EntryRecord, LedgerEntry};
pub use event::Event;
pub use input::{EntryDraft, parse_quantity, parse_unit_price};
pub use projection::{Projection, replay};
