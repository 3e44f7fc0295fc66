//! Aggregator: derived per-user money amounts.
//!
//! Everything here is recomputed from the share store on every query; no
//! cached per-user fields exist anywhere, so a mutation can never leave a
//! stale total behind.

use rust_decimal::Decimal;

use crate::allocation::ItemAllocation;
use crate::models::TaxInfo;
use crate::money;

/// Read-only view over the current allocation snapshot plus the global
/// tax figure.
pub struct BillAggregator<'a> {
    items: &'a [ItemAllocation],
    tax_amount: Decimal,
}

impl<'a> BillAggregator<'a> {
    pub fn new(items: &'a [ItemAllocation], tax_info: Option<&TaxInfo>) -> Self {
        let tax_amount = tax_info
            .map(|t| money::currency_or_zero(&t.amount))
            .unwrap_or(Decimal::ZERO);
        Self { items, tax_amount }
    }

    /// Σ price × (percentage / 100) over the user's items, rounded to
    /// 2 decimals once at the end (not per item) to keep cumulative
    /// rounding error down.
    pub fn user_subtotal(&self, user_id: &str) -> Decimal {
        let raw: Decimal = self
            .items
            .iter()
            .filter_map(|item| {
                let share = item.share_of(user_id)?;
                Some(item.price_amount() * share.percentage / Decimal::from(100))
            })
            .sum();
        money::round2(raw)
    }

    /// Tax apportioned by the user's fraction of the full item subtotal.
    /// Zero when nothing is priced (guards the division).
    pub fn user_tax_share(&self, user_id: &str) -> Decimal {
        let total_subtotal = self.items_subtotal();
        if total_subtotal.is_zero() {
            return Decimal::ZERO;
        }

        let proportion = self.user_subtotal(user_id) / total_subtotal;
        money::round2(proportion * self.tax_amount)
    }

    /// Subtotal plus tax share, 2-decimal rounded.
    pub fn user_total(&self, user_id: &str) -> Decimal {
        money::round2(self.user_subtotal(user_id) + self.user_tax_share(user_id))
    }

    /// Items on which the user holds any share, a 0% share included.
    pub fn item_count(&self, user_id: &str) -> usize {
        self.items
            .iter()
            .filter(|item| item.share_of(user_id).is_some())
            .count()
    }

    /// Σ of all item prices regardless of assignment, 2-decimal rounded.
    pub fn items_subtotal(&self) -> Decimal {
        let raw: Decimal = self.items.iter().map(|i| i.price_amount()).sum();
        money::round2(raw)
    }

    /// Items with no shares at all.
    pub fn unassigned_items(&self) -> Vec<&'a ItemAllocation> {
        self.items.iter().filter(|i| !i.is_assigned()).collect()
    }

    /// Σ of unassigned item prices, 2-decimal rounded.
    pub fn unassigned_total(&self) -> Decimal {
        let raw: Decimal = self
            .items
            .iter()
            .filter(|i| !i.is_assigned())
            .map(|i| i.price_amount())
            .sum();
        money::round2(raw)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
