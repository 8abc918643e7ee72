//! Input boundary: turning typed text into entry fields.
//!
//! Front-ends use these before anything reaches the ledger. Error messages are
//! the ones shown to the user.

use brewledger_core::{DomainError, DomainResult, EntryId, Timestamp};

use crate::entry::{EntryKind, LedgerEntry};

const INVALID_QUANTITY: &str = "Please enter a valid quantity";
const INVALID_PRICE: &str = "Please enter a valid cost/price";

/// Parse a strictly positive whole quantity.
pub fn parse_quantity(input: &str) -> DomainResult<u32> {
    match input.trim().parse::<u32>() {
        Ok(q) if q > 0 => Ok(q),
        _ => Err(DomainError::validation(INVALID_QUANTITY)),
    }
}

/// Parse a finite, non-negative unit price.
pub fn parse_unit_price(input: &str) -> DomainResult<f64> {
    match input.trim().parse::<f64>() {
        Ok(p) if p.is_finite() && p >= 0.0 => Ok(p),
        _ => Err(DomainError::validation(INVALID_PRICE)),
    }
}

/// A validated "add entry" request, not yet assigned an id.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub kind: EntryKind,
    pub quantity: u32,
    pub unit_price: f64,
    /// Business time; `None` means "now" at recording time.
    pub occurred_at: Option<Timestamp>,
}

impl EntryDraft {
    pub fn new(kind: EntryKind, quantity: u32, unit_price: f64) -> Self {
        Self {
            kind,
            quantity,
            unit_price,
            occurred_at: None,
        }
    }

    /// Build a draft from raw form text.
    pub fn parse(kind: EntryKind, quantity: &str, unit_price: &str) -> DomainResult<Self> {
        Ok(Self::new(kind, parse_quantity(quantity)?, parse_unit_price(unit_price)?))
    }

    pub fn at(mut self, occurred_at: Timestamp) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    /// Materialize the entry, falling back to `now` when no time was given.
    pub fn into_entry(self, id: EntryId, now: Timestamp) -> DomainResult<LedgerEntry> {
        LedgerEntry::new(
            id,
            self.kind,
            self.quantity,
            self.unit_price,
            self.occurred_at.unwrap_or(now),
        )
    }
}
