//! Inventory module: the finished-product stock trajectory.
//!
//! Pure, deterministic projection over ledger entries (no IO, no storage).

pub mod policy;
pub mod projector;

pub use policy::SnapshotPolicy;
pub use projector::{InventoryProjector, InventorySnapshot};
