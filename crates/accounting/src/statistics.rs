//! Ledger statistics: spend, revenue, profit, yields and unit averages.
//!
//! Statistics are never stored. They are recomputed from the full entry list
//! on every change by folding it through [`LedgerAggregator`].

use serde::{Deserialize, Serialize};

use brewledger_events::{EntryKind, LedgerEntry, Projection};

use crate::recipe::{RECIPE, after_tax};

/// Raw per-category totals the statistics are derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTotals {
    pub material_purchase_spend: f64,
    pub material_units_purchased: u64,
    pub material_gathered_cost: f64,
    pub material_units_gathered: u64,
    pub component_spend: f64,
    pub component_units_purchased: u64,
    pub gross_sales_revenue: f64,
    pub units_sold: u64,
}

impl LedgerTotals {
    pub fn material_units(&self) -> u64 {
        self.material_units_purchased + self.material_units_gathered
    }

    /// Cost basis of all raw material, bought or gathered.
    pub fn material_cost(&self) -> f64 {
        self.material_purchase_spend + self.material_gathered_cost
    }
}

/// Summary figures shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_material_spend: f64,
    pub total_component_spend: f64,
    pub total_revenue_after_tax: f64,
    pub net_profit: f64,
    pub units_produced_from_gathered: u64,
    pub units_produced_from_purchased: u64,
    pub average_material_unit_cost: f64,
    pub average_product_unit_price_after_tax: f64,
}

impl Statistics {
    /// Everything spent on the marketplace (material + components).
    pub fn total_spend(&self) -> f64 {
        self.total_material_spend + self.total_component_spend
    }

    fn from_totals(totals: &LedgerTotals) -> Self {
        let total_revenue_after_tax = after_tax(totals.gross_sales_revenue);
        let material_units = totals.material_units();

        Self {
            total_material_spend: totals.material_purchase_spend,
            total_component_spend: totals.component_spend,
            total_revenue_after_tax,
            net_profit: total_revenue_after_tax
                - totals.material_purchase_spend
                - totals.component_spend,
            units_produced_from_gathered: RECIPE.products_from_material(totals.material_units_gathered),
            units_produced_from_purchased: RECIPE.products_from_material(totals.material_units_purchased),
            average_material_unit_cost: ratio_or_zero(totals.material_cost(), material_units),
            average_product_unit_price_after_tax: ratio_or_zero(total_revenue_after_tax, totals.units_sold),
        }
    }
}

fn ratio_or_zero(amount: f64, units: u64) -> f64 {
    if units == 0 { 0.0 } else { amount / units as f64 }
}

/// Gross amounts and unit count recorded for one entry kind.
///
/// Amounts are kept as individual terms and summed in sorted order, so the
/// total depends only on the multiset of entries, never on their order.
#[derive(Debug, Clone, Default, PartialEq)]
struct KindTally {
    amounts: Vec<f64>,
    units: u64,
}

impl KindTally {
    fn add(&mut self, gross: f64, units: u64) {
        self.amounts.push(gross);
        self.units += units;
    }

    fn total(&self) -> f64 {
        let mut sorted = self.amounts.clone();
        sorted.sort_by(f64::total_cmp);
        sorted.into_iter().fold(0.0, |acc, amount| acc + amount)
    }

    fn clear(&mut self) {
        self.amounts.clear();
        self.units = 0;
    }
}

/// Folds ledger entries into [`Statistics`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerAggregator {
    material_purchases: KindTally,
    material_gathered: KindTally,
    component_purchases: KindTally,
    product_sales: KindTally,
}

impl LedgerAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute statistics for `entries` (any order).
    pub fn aggregate<'a, I>(entries: I) -> Statistics
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
    {
        brewledger_events::replay::<Self, _>(entries).statistics()
    }

    pub fn totals(&self) -> LedgerTotals {
        LedgerTotals {
            material_purchase_spend: self.material_purchases.total(),
            material_units_purchased: self.material_purchases.units,
            material_gathered_cost: self.material_gathered.total(),
            material_units_gathered: self.material_gathered.units,
            component_spend: self.component_purchases.total(),
            component_units_purchased: self.component_purchases.units,
            gross_sales_revenue: self.product_sales.total(),
            units_sold: self.product_sales.units,
        }
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::from_totals(&self.totals())
    }
}

impl Projection for LedgerAggregator {
    fn apply(&mut self, entry: &LedgerEntry) {
        let tally = match entry.kind() {
            EntryKind::MaterialPurchase => &mut self.material_purchases,
            EntryKind::MaterialGathered => &mut self.material_gathered,
            EntryKind::ComponentPurchase => &mut self.component_purchases,
            EntryKind::ProductSale => &mut self.product_sales,
        };
        tally.add(entry.gross_total(), u64::from(entry.quantity()));
    }

    fn reset(&mut self) {
        for tally in [
            &mut self.material_purchases,
            &mut self.material_gathered,
            &mut self.component_purchases,
            &mut self.product_sales,
        ] {
            tally.clear();
        }
    }
}
