//! Completion Checker: gates expense submission.
//!
//! The allocation set is submit-ready only when every item holds at least
//! one share and every item's shares sum to 100 within epsilon.

use rust_decimal::Decimal;

use crate::allocation::ItemAllocation;

/// True iff every item is assigned and balanced. An empty set is never
/// fully assigned (there is nothing to submit).
pub fn is_fully_assigned(items: &[ItemAllocation]) -> bool {
    if items.is_empty() {
        return false;
    }
    items.iter().all(|item| item.is_balanced())
}

/// Percentage (0..=100) of items that are both non-empty and balanced.
/// 0 when there are no items.
pub fn assignment_progress(items: &[ItemAllocation]) -> Decimal {
    if items.is_empty() {
        return Decimal::ZERO;
    }

    let balanced = items.iter().filter(|item| item.is_balanced()).count();
    Decimal::from(100) * Decimal::from(balanced) / Decimal::from(items.len())
}

// ============================================================================
// Unit Tests
// ============================================================================
