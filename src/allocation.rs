//! Share Store: per-item user percentage assignments.
//!
//! An [`ItemAllocation`] is one priced receipt line plus its ordered share
//! collection (at most one share per user). Allocations start unassigned
//! and are mutated only through the operators in [`crate::engine`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::money;

/// Shares within this distance of 100 count as balanced.
///
/// Equal-toggle splits store fractional percentages (100/3 three times sums
/// to 99.99..), so exact comparison would flag them incomplete forever.
pub fn balance_epsilon() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

// ============================================================================
// Share
// ============================================================================

/// One user's percentage of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Share {
    #[schema(example = "1042")]
    pub user_id: String,
    /// 0..=100. Whole at the point of storage except for equal-toggle
    /// splits, which are intentionally fractional.
    pub percentage: Decimal,
}

impl Share {
    pub fn new(user_id: impl Into<String>, percentage: Decimal) -> Self {
        Self { user_id: user_id.into(), percentage }
    }
}

// ============================================================================
// Item Allocation
// ============================================================================

/// Classification of one allocation's share sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AllocationState {
    /// No shares at all
    Unassigned,
    /// Shares present but the sum is off 100 by more than epsilon
    Imbalanced,
    /// Sum within epsilon of 100
    Balanced,
}

/// A receipt item plus its current set of user shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemAllocation {
    #[schema(example = "0_2")]
    pub id: String,
    #[schema(example = "Oat milk")]
    pub name: String,
    /// `"$<number>"` currency string as extracted; malformed prices count
    /// as 0 in every aggregate
    #[schema(example = "$4.25")]
    pub price: String,
    pub shares: Vec<Share>,
}

impl ItemAllocation {
    /// New allocation with no shares (unassigned).
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: price.into(),
            shares: Vec::new(),
        }
    }

    /// Item price as a decimal amount; malformed input degrades to 0.
    pub fn price_amount(&self) -> Decimal {
        money::currency_or_zero(&self.price)
    }

    /// Sum of all share percentages.
    pub fn total_percentage(&self) -> Decimal {
        self.shares.iter().map(|s| s.percentage).sum()
    }

    /// The share held by `user_id`, if any.
    pub fn share_of(&self, user_id: &str) -> Option<&Share> {
        self.shares.iter().find(|s| s.user_id == user_id)
    }

    pub fn is_assigned(&self) -> bool {
        !self.shares.is_empty()
    }

    /// Shares sum to 100 within epsilon.
    pub fn is_balanced(&self) -> bool {
        self.is_assigned()
            && (self.total_percentage() - Decimal::from(100)).abs() < balance_epsilon()
    }

    pub fn state(&self) -> AllocationState {
        if !self.is_assigned() {
            AllocationState::Unassigned
        } else if self.is_balanced() {
            AllocationState::Balanced
        } else {
            AllocationState::Imbalanced
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item_with(shares: &[(&str, i64)]) -> ItemAllocation {
        let mut item = ItemAllocation::new("1", "Test", "$10.00");
        item.shares = shares
            .iter()
            .map(|(u, p)| Share::new(*u, Decimal::from(*p)))
            .collect();
        item
    }

    #[test]
    fn test_new_allocation_is_unassigned() {
        let item = ItemAllocation::new("1", "Coffee", "$3.50");
        assert_eq!(item.state(), AllocationState::Unassigned);
        assert!(!item.is_assigned());
        assert_eq!(item.total_percentage(), Decimal::ZERO);
    }

    #[test]
    fn test_balanced_exact_sum() {
        let item = item_with(&[("a", 34), ("b", 33), ("c", 33)]);
        assert_eq!(item.state(), AllocationState::Balanced);
    }

    #[test]
    fn test_balanced_within_epsilon() {
        // Three fractional equal shares: 100/3 each
        let third = Decimal::from(100) / Decimal::from(3);
        let mut item = ItemAllocation::new("1", "Test", "$10.00");
        item.shares = vec![
            Share::new("a", third),
            Share::new("b", third),
            Share::new("c", third),
        ];
        assert_eq!(item.state(), AllocationState::Balanced);
    }

    #[test]
    fn test_imbalanced_sum() {
        let item = item_with(&[("a", 40), ("b", 40)]);
        assert_eq!(item.state(), AllocationState::Imbalanced);
        assert!(!item.is_balanced());
    }

    #[test]
    fn test_price_amount_malformed_is_zero() {
        let item = ItemAllocation::new("1", "Mystery", "???");
        assert_eq!(item.price_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_share_of() {
        let item = item_with(&[("a", 60), ("b", 40)]);
        assert_eq!(item.share_of("a").map(|s| s.percentage), Some(Decimal::from(60)));
        assert!(item.share_of("zz").is_none());
    }
}
