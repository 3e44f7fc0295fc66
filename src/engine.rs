//! Allocation Engine: mutation operators over the share store.
//!
//! Every operator is a pure transform: it takes the current allocation
//! collection and produces a new one. Unknown item or user ids are no-ops,
//! never errors, so a stale UI event can never corrupt or abort a session.
//!
//! Rounding policy (intentional asymmetry, do not "fix"):
//! - manual edits, equal distribution and remainder balancing store whole
//!   percentages;
//! - [`AllocationEngine::toggle_assignment`] stores the exact fractional
//!   `100 / count` so that equal splits stay balanced under the 0.01
//!   epsilon instead of drifting with every toggle.

use rust_decimal::prelude::*;

use crate::allocation::{ItemAllocation, Share};
use crate::models::User;
use crate::money;

/// Stateless operator set over `&[ItemAllocation]`.
pub struct AllocationEngine;

impl AllocationEngine {
    // ========================================================================
    // Toggle
    // ========================================================================

    /// Add `user_id` to the item's shares, or remove it if already present.
    ///
    /// Both directions re-split the item equally across the users that
    /// remain: removal rescales the survivors back to a 100 sum, addition
    /// gives everyone (including the newcomer) `100 / count`. The division
    /// is deliberately left fractional; see the module docs.
    pub fn toggle_assignment(
        items: &[ItemAllocation],
        users: &[User],
        item_id: &str,
        user_id: &str,
    ) -> Vec<ItemAllocation> {
        if !users.iter().any(|u| u.id == user_id) {
            return items.to_vec();
        }

        items
            .iter()
            .map(|item| {
                if item.id != item_id {
                    return item.clone();
                }

                let mut next = item.clone();
                let was_assigned = next.shares.iter().any(|s| s.user_id == user_id);

                if was_assigned {
                    next.shares.retain(|s| s.user_id != user_id);
                } else {
                    next.shares.push(Share::new(user_id, Decimal::ZERO));
                }

                if !next.shares.is_empty() {
                    let equal = Decimal::from(100) / Decimal::from(next.shares.len());
                    for share in &mut next.shares {
                        share.percentage = equal;
                    }
                }

                next
            })
            .collect()
    }

    // ========================================================================
    // Bulk assignment
    // ========================================================================

    /// Give `user_id` 100% of every item, discarding previous shares.
    pub fn assign_all_to_one(
        items: &[ItemAllocation],
        users: &[User],
        user_id: &str,
    ) -> Vec<ItemAllocation> {
        if !users.iter().any(|u| u.id == user_id) {
            return items.to_vec();
        }

        items
            .iter()
            .map(|item| {
                let mut next = item.clone();
                next.shares = vec![Share::new(user_id, Decimal::from(100))];
                next
            })
            .collect()
    }

    /// Replace every item's shares with an exact integer equal split across
    /// the whole roster: the first `100 mod N` users in roster order absorb
    /// the remainder unit.
    pub fn split_all_equally(items: &[ItemAllocation], users: &[User]) -> Vec<ItemAllocation> {
        if users.is_empty() {
            return items.to_vec();
        }

        let count = users.len() as i64;
        let equal = 100 / count;
        let extras = (100 % count) as usize;

        items
            .iter()
            .map(|item| {
                let mut next = item.clone();
                next.shares = users
                    .iter()
                    .enumerate()
                    .map(|(idx, user)| {
                        let bonus = if idx < extras { 1 } else { 0 };
                        Share::new(user.id.clone(), Decimal::from(equal + bonus))
                    })
                    .collect();
                next
            })
            .collect()
    }

    // ========================================================================
    // Manual editing
    // ========================================================================

    /// Set one user's percentage on one item without touching siblings.
    ///
    /// The raw value is rounded to a whole number and capped so that the
    /// item's sum can never exceed 100. Siblings are never rebalanced here.
    pub fn update_share_percentage(
        items: &[ItemAllocation],
        item_id: &str,
        user_id: &str,
        raw_percentage: f64,
    ) -> Vec<ItemAllocation> {
        let rounded =
            money::round_whole(Decimal::from_f64(raw_percentage).unwrap_or(Decimal::ZERO));

        items
            .iter()
            .map(|item| {
                if item.id != item_id {
                    return item.clone();
                }

                let Some(target) = item.shares.iter().position(|s| s.user_id == user_id) else {
                    return item.clone();
                };

                let others: Decimal = item
                    .shares
                    .iter()
                    .enumerate()
                    .filter(|(idx, _)| *idx != target)
                    .map(|(_, s)| s.percentage)
                    .sum();
                let max_allowed = Decimal::from(100) - others;

                let mut next = item.clone();
                next.shares[target].percentage = rounded.min(money::round_whole(max_allowed));
                next
            })
            .collect()
    }

    /// Reset one item's shares to an exact integer equal split over its
    /// current share count, remainder units to the first shares in order.
    pub fn distribute_equally(items: &[ItemAllocation], item_id: &str) -> Vec<ItemAllocation> {
        items
            .iter()
            .map(|item| {
                if item.id != item_id || item.shares.is_empty() {
                    return item.clone();
                }

                let count = item.shares.len() as i64;
                let equal = 100 / count;
                let remainder = (100 - equal * count) as usize;

                let mut next = item.clone();
                for (idx, share) in next.shares.iter_mut().enumerate() {
                    let bonus = if idx < remainder { 1 } else { 0 };
                    share.percentage = Decimal::from(equal + bonus);
                }
                next
            })
            .collect()
    }

    /// Spread the gap to 100 over the existing distribution instead of
    /// resetting it: every share gets `floor(remaining / count)` on top of
    /// its rounded percentage, the first shares absorb the leftover unit.
    ///
    /// `remaining` may be negative (over-assigned items shrink back).
    /// No-op when the sum is already exactly 100 or there are no shares.
    pub fn balance_remaining_percentage(
        items: &[ItemAllocation],
        item_id: &str,
    ) -> Vec<ItemAllocation> {
        items
            .iter()
            .map(|item| {
                if item.id != item_id || item.shares.is_empty() {
                    return item.clone();
                }

                let total = item.total_percentage();
                if total == Decimal::from(100) {
                    return item.clone();
                }

                let remaining = Decimal::from(100) - total;
                let count = Decimal::from(item.shares.len());
                let base_add = (remaining / count).floor();
                let remainder = remaining - base_add * count;

                let mut next = item.clone();
                for (idx, share) in next.shares.iter_mut().enumerate() {
                    let bonus = if Decimal::from(idx) < remainder {
                        Decimal::ONE
                    } else {
                        Decimal::ZERO
                    };
                    share.percentage = money::round_whole(share.percentage) + base_add + bonus;
                }
                next
            })
            .collect()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
