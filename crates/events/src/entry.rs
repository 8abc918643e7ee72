//! Ledger entry model.

use serde::{Deserialize, Serialize};

use brewledger_core::{DomainError, DomainResult, EntryId, Timestamp};

use crate::event::Event;

/// The four things a user can record.
///
/// Every consumer matches on this exhaustively (no wildcard arms), so adding a
/// variant fails to compile until the aggregator and the projector handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Raw material bought on the marketplace.
    #[serde(alias = "fish_purchase")]
    MaterialPurchase,
    /// Raw material gathered by the user; carries an opportunity cost (often 0).
    #[serde(alias = "fish_caught")]
    MaterialGathered,
    /// Secondary ingredient bought on the marketplace.
    #[serde(alias = "kelp_purchase")]
    ComponentPurchase,
    /// Finished product sold through the taxed marketplace.
    #[serde(alias = "potion_sale")]
    ProductSale,
}

impl EntryKind {
    pub const ALL: [EntryKind; 4] = [
        EntryKind::MaterialPurchase,
        EntryKind::MaterialGathered,
        EntryKind::ComponentPurchase,
        EntryKind::ProductSale,
    ];

    /// Human-readable label used by listings.
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::MaterialPurchase => "Material purchase",
            EntryKind::MaterialGathered => "Material gathered",
            EntryKind::ComponentPurchase => "Component purchase",
            EntryKind::ProductSale => "Product sale",
        }
    }

    /// Stable wire value (matches the serde representation).
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::MaterialPurchase => "material_purchase",
            EntryKind::MaterialGathered => "material_gathered",
            EntryKind::ComponentPurchase => "component_purchase",
            EntryKind::ProductSale => "product_sale",
        }
    }

    pub fn is_sale(self) -> bool {
        matches!(self, EntryKind::ProductSale)
    }
}

impl core::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire shape of a ledger entry.
///
/// `timestamp` is epoch milliseconds. Field aliases accept blobs written by
/// the older mobile build (`type`, `costPerUnit`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRecord {
    pub id: EntryId,
    #[serde(alias = "type")]
    pub kind: EntryKind,
    pub quantity: i64,
    #[serde(alias = "costPerUnit")]
    pub unit_price: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: Timestamp,
}

/// One recorded purchase, gather or sale.
///
/// Immutable once built; an edit replaces the whole entry under the same id.
/// Construction enforces `quantity > 0` and a finite `unit_price >= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EntryRecord", into = "EntryRecord")]
pub struct LedgerEntry {
    id: EntryId,
    kind: EntryKind,
    quantity: u32,
    unit_price: f64,
    occurred_at: Timestamp,
}

impl LedgerEntry {
    pub fn new(
        id: EntryId,
        kind: EntryKind,
        quantity: u32,
        unit_price: f64,
        occurred_at: Timestamp,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if !unit_price.is_finite() || unit_price < 0.0 {
            return Err(DomainError::validation("unit price must be a non-negative number"));
        }
        Ok(Self {
            id,
            kind,
            quantity,
            unit_price,
            occurred_at,
        })
    }

    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn timestamp(&self) -> Timestamp {
        self.occurred_at
    }

    /// `quantity * unit_price`, before any marketplace tax.
    pub fn gross_total(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

impl TryFrom<EntryRecord> for LedgerEntry {
    type Error = DomainError;

    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(record.quantity)
            .map_err(|_| DomainError::validation(format!("quantity out of range: {}", record.quantity)))?;
        LedgerEntry::new(record.id, record.kind, quantity, record.unit_price, record.timestamp)
    }
}

impl From<LedgerEntry> for EntryRecord {
    fn from(entry: LedgerEntry) -> Self {
        Self {
            id: entry.id,
            kind: entry.kind,
            quantity: i64::from(entry.quantity),
            unit_price: entry.unit_price,
            timestamp: entry.occurred_at,
        }
    }
}

impl Event for LedgerEntry {
    fn event_type(&self) -> &'static str {
        match self.kind {
            EntryKind::MaterialPurchase => "ledger.material.purchased",
            EntryKind::MaterialGathered => "ledger.material.gathered",
            EntryKind::ComponentPurchase => "ledger.component.purchased",
            EntryKind::ProductSale => "ledger.product.sold",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> Timestamp {
        self.occurred_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn ts(ms: i64) -> Timestamp {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn id(s: &str) -> EntryId {
        s.parse().unwrap()
    }

    #[test]
    fn rejects_zero_quantity() {
        let err = LedgerEntry::new(id("a"), EntryKind::ProductSale, 0, 44.0, ts(0)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rejects_negative_or_nan_price() {
        assert!(LedgerEntry::new(id("a"), EntryKind::MaterialPurchase, 1, -0.01, ts(0)).is_err());
        assert!(LedgerEntry::new(id("a"), EntryKind::MaterialPurchase, 1, f64::NAN, ts(0)).is_err());
        assert!(LedgerEntry::new(id("a"), EntryKind::MaterialPurchase, 1, f64::INFINITY, ts(0)).is_err());
    }

    #[test]
    fn zero_price_is_allowed_for_gathered_material() {
        let entry = LedgerEntry::new(id("a"), EntryKind::MaterialGathered, 12, 0.0, ts(0)).unwrap();
        assert_eq!(entry.gross_total(), 0.0);
    }

    #[test]
    fn serializes_with_string_id_and_millisecond_timestamp() {
        let entry =
            LedgerEntry::new(id("42"), EntryKind::ProductSale, 8, 44.0, ts(1_700_000_000_123)).unwrap();
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "42",
                "kind": "product_sale",
                "quantity": 8,
                "unitPrice": 44.0,
                "timestamp": 1_700_000_000_123i64,
            })
        );
    }

    #[test]
    fn reads_legacy_field_names() {
        let legacy = json!({
            "id": "1718000000000",
            "type": "fish_caught",
            "quantity": 9,
            "costPerUnit": 0,
            "timestamp": 1_718_000_000_000i64,
        });
        let entry: LedgerEntry = serde_json::from_value(legacy).unwrap();
        assert_eq!(entry.kind(), EntryKind::MaterialGathered);
        assert_eq!(entry.quantity(), 9);
        assert_eq!(entry.timestamp(), ts(1_718_000_000_000));
    }

    #[test]
    fn deserialization_enforces_invariants() {
        let bad = json!({
            "id": "x",
            "kind": "product_sale",
            "quantity": -3,
            "unitPrice": 44.0,
            "timestamp": 0,
        });
        assert!(serde_json::from_value::<LedgerEntry>(bad).is_err());
    }

    #[test]
    fn every_kind_has_a_distinct_event_type() {
        let mut seen = std::collections::HashSet::new();
        for kind in EntryKind::ALL {
            let entry = LedgerEntry::new(id("k"), kind, 1, 1.0, ts(0)).unwrap();
            assert!(seen.insert(entry.event_type()));
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
        }
        assert_eq!(seen.len(), EntryKind::ALL.len());
    }
}
