//! Business-time helpers.
//!
//! Timestamps are `DateTime<Utc>` in memory and epoch milliseconds on the wire.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{DomainError, DomainResult};

/// Point in time a ledger entry occurred.
pub type Timestamp = DateTime<Utc>;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date typed by the user into a timestamp at UTC midnight.
///
/// Front-ends call this at the input boundary; the core never parses dates.
pub fn parse_date(input: &str) -> DomainResult<Timestamp> {
    let trimmed = input.trim();
    let date = NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| DomainError::validation(format!("invalid date '{trimmed}', expected YYYY-MM-DD")))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| DomainError::validation(format!("invalid date '{trimmed}'")))?;
    Ok(midnight.and_utc())
}

/// Format a timestamp the way `parse_date` reads it back.
pub fn format_date(ts: Timestamp) -> String {
    ts.format(DATE_FORMAT).to_string()
}
