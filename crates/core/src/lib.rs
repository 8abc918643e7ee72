//! `brewledger-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no storage).

pub mod aggregate;
pub mod error;
pub mod id;
pub mod time;

pub use aggregate::Aggregate;
pub use error::{DomainError, DomainResult};
pub use id::EntryId;
pub use time::{Timestamp, format_date, parse_date};
