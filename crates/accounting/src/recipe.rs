//! Fixed economy constants: marketplace tax and the crafting recipe.

use brewledger_events::{EntryKind, LedgerEntry};

/// Marketplace cut taken from every sale.
pub const TAX_RATE: f64 = 0.05;

/// Share of a sale's gross that reaches the seller.
pub const AFTER_TAX_FACTOR: f64 = 1.0 - TAX_RATE;

/// Units of raw material consumed per finished product.
pub const UNITS_PER_PRODUCT: u64 = RECIPE.material_per_product();

/// Crafting recipe: raw material → intermediate → product.
///
/// The one component each product also needs is not tracked by any figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recipe {
    pub material_per_intermediate: u64,
    pub intermediates_per_product: u64,
}

impl Recipe {
    pub const fn material_per_product(&self) -> u64 {
        self.material_per_intermediate * self.intermediates_per_product
    }

    /// Whole products obtainable from `material_units`; the remainder is discarded.
    pub const fn products_from_material(&self, material_units: u64) -> u64 {
        material_units / self.material_per_product()
    }
}

pub const RECIPE: Recipe = Recipe {
    material_per_intermediate: 2,
    intermediates_per_product: 2,
};

/// Price pre-filled when the user starts recording an entry of `kind`.
pub fn default_unit_price(kind: EntryKind) -> f64 {
    match kind {
        EntryKind::MaterialPurchase => 10.0,
        EntryKind::MaterialGathered => 0.0,
        EntryKind::ComponentPurchase => 4.0,
        EntryKind::ProductSale => 44.0,
    }
}

pub fn after_tax(gross: f64) -> f64 {
    gross * AFTER_TAX_FACTOR
}

/// Entry total as listings show it: after tax for sales, gross for everything else.
pub fn display_total(entry: &LedgerEntry) -> f64 {
    match entry.kind() {
        EntryKind::ProductSale => after_tax(entry.gross_total()),
        EntryKind::MaterialPurchase | EntryKind::MaterialGathered | EntryKind::ComponentPurchase => {
            entry.gross_total()
        }
    }
}
