//! Accounting module: marketplace tax, recipe yields and ledger statistics.
//!
//! Pure domain logic only: no IO, no persistence concerns.

pub mod recipe;
pub mod statistics;

pub use recipe::{
    AFTER_TAX_FACTOR, RECIPE, Recipe, TAX_RATE, UNITS_PER_PRODUCT, after_tax, default_unit_price,
    display_total,
};
pub use statistics::{LedgerAggregator, LedgerTotals, Statistics};
