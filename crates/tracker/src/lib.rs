//! `brewledger-tracker`
//!
//! **Responsibility:** own the ledger state and drive the
//! mutate → recompute → persist loop.
//!
//! - [`LedgerState`]: explicit, passed-around ledger (entries + trajectory)
//! - [`LedgerSession`]: state bound to a [`LedgerStore`](brewledger_infra::LedgerStore)
//! - [`DashboardReport`]: serializable summary for front-ends

pub mod report;
pub mod session;
pub mod state;

pub use report::{DashboardReport, EntryRow};
pub use session::LedgerSession;
pub use state::{AmendEntry, LedgerChange, LedgerCommand, LedgerState, RecordEntry, RemoveEntry};
