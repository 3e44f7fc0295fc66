//! Session record: one explicit, immutable state container per editing
//! session.
//!
//! Every mutation goes through a reducer-style operator that returns a new
//! record; readers (aggregator, completion checker, snapshot builder)
//! always see a fully settled post-mutation state. One logical writer at a
//! time; the gateway serializes access behind a lock.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregator::BillAggregator;
use crate::allocation::ItemAllocation;
use crate::completion;
use crate::engine::AllocationEngine;
use crate::models::{ExpenseRequest, TaxInfo, User, UserSplit};
use crate::money;

/// Longest accepted expense description.
pub const MAX_DESCRIPTION_LEN: usize = 100;

// ============================================================================
// Submission blockers
// ============================================================================

/// A specific missing precondition that blocks expense submission.
///
/// The message text is user-visible; the ledger call is never issued while
/// any of these hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitBlocker {
    #[error("Missing required information: No payer selected")]
    NoPayer,

    #[error("Missing required information: Tax information not available")]
    NoTaxInfo,

    #[error("Missing required information: Subtotal or total amount not available")]
    NoTotals,

    #[error("Please enter an expense description")]
    NoDescription,

    #[error("All items must be fully assigned with shares totaling 100%")]
    NotFullyAssigned,
}

// ============================================================================
// Session record
// ============================================================================

/// Working state of one receipt-splitting session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitSession {
    pub users: Vec<User>,
    pub items: Vec<ItemAllocation>,
    pub tax_info: Option<TaxInfo>,
    /// Bill-level subtotal as computed upstream, carried opaquely
    pub subtotal: Option<String>,
    /// Bill-level total as computed upstream, carried opaquely
    pub total: Option<String>,
    pub payer: Option<String>,
    pub description: String,
    pub group_id: String,
    pub primary_receipt_path: Option<String>,
    pub all_receipt_paths: Vec<String>,
}

impl SplitSession {
    /// Seed a fresh working set from an extraction round.
    ///
    /// Replaces the previous item set wholesale; the payer survives when
    /// still on the new roster, otherwise it defaults to the first user.
    #[allow(clippy::too_many_arguments)]
    pub fn begin(
        &self,
        users: Vec<User>,
        items: Vec<ItemAllocation>,
        tax_info: Option<TaxInfo>,
        subtotal: Option<String>,
        total: Option<String>,
        primary_receipt_path: Option<String>,
        all_receipt_paths: Vec<String>,
    ) -> Self {
        let payer = self
            .payer
            .as_ref()
            .filter(|p| users.iter().any(|u| &u.id == *p))
            .cloned()
            .or_else(|| users.first().map(|u| u.id.clone()));

        Self {
            users,
            items,
            tax_info,
            subtotal,
            total,
            payer,
            description: self.description.clone(),
            group_id: self.group_id.clone(),
            primary_receipt_path,
            all_receipt_paths,
        }
    }

    /// Drop the working set but keep roster and payer for the next round.
    pub fn reset(&self) -> Self {
        Self {
            users: self.users.clone(),
            payer: self.payer.clone(),
            group_id: self.group_id.clone(),
            ..Self::default()
        }
    }

    // ========================================================================
    // Reducer operators (each returns the next session record)
    // ========================================================================

    pub fn toggle_assignment(&self, item_id: &str, user_id: &str) -> Self {
        self.with_items(AllocationEngine::toggle_assignment(
            &self.items,
            &self.users,
            item_id,
            user_id,
        ))
    }

    pub fn update_share_percentage(&self, item_id: &str, user_id: &str, raw: f64) -> Self {
        self.with_items(AllocationEngine::update_share_percentage(
            &self.items,
            item_id,
            user_id,
            raw,
        ))
    }

    pub fn distribute_equally(&self, item_id: &str) -> Self {
        self.with_items(AllocationEngine::distribute_equally(&self.items, item_id))
    }

    pub fn balance_remaining_percentage(&self, item_id: &str) -> Self {
        self.with_items(AllocationEngine::balance_remaining_percentage(
            &self.items,
            item_id,
        ))
    }

    pub fn assign_all_to_one(&self, user_id: &str) -> Self {
        self.with_items(AllocationEngine::assign_all_to_one(
            &self.items,
            &self.users,
            user_id,
        ))
    }

    pub fn split_all_equally(&self) -> Self {
        self.with_items(AllocationEngine::split_all_equally(&self.items, &self.users))
    }

    /// Unknown payer ids are a no-op, matching the engine's edge policy.
    pub fn set_payer(&self, user_id: &str) -> Self {
        if !self.users.iter().any(|u| u.id == user_id) {
            return self.clone();
        }
        Self { payer: Some(user_id.to_string()), ..self.clone() }
    }

    pub fn set_description(&self, description: &str) -> Self {
        Self { description: description.to_string(), ..self.clone() }
    }

    pub fn set_group(&self, group_id: &str) -> Self {
        Self { group_id: group_id.to_string(), ..self.clone() }
    }

    fn with_items(&self, items: Vec<ItemAllocation>) -> Self {
        Self { items, ..self.clone() }
    }

    // ========================================================================
    // Derived views
    // ========================================================================

    pub fn aggregator(&self) -> BillAggregator<'_> {
        BillAggregator::new(&self.items, self.tax_info.as_ref())
    }

    pub fn is_fully_assigned(&self) -> bool {
        completion::is_fully_assigned(&self.items)
    }

    pub fn assignment_progress(&self) -> Decimal {
        completion::assignment_progress(&self.items)
    }

    // ========================================================================
    // Submission
    // ========================================================================

    /// Check every submission precondition, most fundamental first.
    pub fn validate_for_submission(&self) -> Result<(), SubmitBlocker> {
        if self.payer.is_none() {
            return Err(SubmitBlocker::NoPayer);
        }
        if self.tax_info.is_none() {
            return Err(SubmitBlocker::NoTaxInfo);
        }
        if self.subtotal.is_none() || self.total.is_none() {
            return Err(SubmitBlocker::NoTotals);
        }
        if self.description.trim().is_empty() {
            return Err(SubmitBlocker::NoDescription);
        }
        if !self.is_fully_assigned() {
            return Err(SubmitBlocker::NotFullyAssigned);
        }
        Ok(())
    }

    /// Assemble the ledger payload: the payer fronts the whole bill total,
    /// everyone (payer included) owes their aggregated per-user total.
    pub fn build_expense_request(&self) -> Result<ExpenseRequest, SubmitBlocker> {
        self.validate_for_submission()?;

        // validate_for_submission guarantees these are present
        let payer = self.payer.clone().ok_or(SubmitBlocker::NoPayer)?;
        let total = self.total.clone().ok_or(SubmitBlocker::NoTotals)?;
        let tax_info = self.tax_info.as_ref().ok_or(SubmitBlocker::NoTaxInfo)?;

        let total_amount = money::round2(money::currency_or_zero(&total));
        let tax_amount = money::round2(money::currency_or_zero(&tax_info.amount));

        let agg = self.aggregator();
        let user_splits = self
            .users
            .iter()
            .map(|user| UserSplit {
                id: user.id.clone(),
                name: user.name.clone(),
                paid: if user.id == payer {
                    total_amount.to_f64().unwrap_or_default()
                } else {
                    0.0
                },
                owed: agg.user_total(&user.id).to_f64().unwrap_or_default(),
            })
            .collect();

        Ok(ExpenseRequest {
            description: self.description.clone(),
            payer,
            total_amount: total_amount.to_f64().unwrap_or_default(),
            tax: tax_amount.to_f64().unwrap_or_default(),
            user_splits,
            group_id: self.group_id.clone(),
            receipt_path: self.primary_receipt_path.clone().unwrap_or_default(),
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<User> {
        vec![User::new("a", "Alice", 0), User::new("b", "Bob", 1)]
    }

    fn seeded() -> SplitSession {
        SplitSession::default().begin(
            roster(),
            vec![
                ItemAllocation::new("1", "Coffee", "$6.00"),
                ItemAllocation::new("2", "Bagel", "$4.00"),
            ],
            Some(TaxInfo { rate: 0.08, amount: "0.80".into() }),
            Some("10.00".into()),
            Some("10.80".into()),
            Some("receipts/r1.jpg".into()),
            vec!["receipts/r1.jpg".into()],
        )
    }

    #[test]
    fn test_begin_defaults_payer_to_first_user() {
        let session = seeded();
        assert_eq!(session.payer.as_deref(), Some("a"));
    }

    #[test]
    fn test_begin_keeps_valid_payer_across_rounds() {
        let session = seeded().set_payer("b");
        let next = session.begin(
            roster(),
            vec![ItemAllocation::new("9", "Tea", "$2.00")],
            None,
            None,
            None,
            None,
            Vec::new(),
        );
        assert_eq!(next.payer.as_deref(), Some("b"));
    }

    #[test]
    fn test_begin_replaces_stale_payer() {
        let session = seeded().set_payer("b");
        let other_roster = vec![User::new("x", "Xan", 0)];
        let next = session.begin(
            other_roster,
            Vec::new(),
            None,
            None,
            None,
            None,
            Vec::new(),
        );
        assert_eq!(next.payer.as_deref(), Some("x"));
    }

    #[test]
    fn test_operators_do_not_mutate_the_source_record() {
        let session = seeded();
        let next = session.toggle_assignment("1", "a");

        assert!(session.items[0].shares.is_empty());
        assert_eq!(next.items[0].shares.len(), 1);
    }

    #[test]
    fn test_set_payer_unknown_user_is_noop() {
        let session = seeded();
        let same = session.set_payer("ghost");
        assert_eq!(same.payer, session.payer);
    }

    #[test]
    fn test_reset_keeps_roster_payer_and_group() {
        let session = seeded()
            .set_payer("b")
            .set_group("35")
            .set_description("Dinner")
            .split_all_equally();

        let fresh = session.reset();
        assert_eq!(fresh.users, session.users);
        assert_eq!(fresh.payer.as_deref(), Some("b"));
        assert_eq!(fresh.group_id, "35");
        assert!(fresh.items.is_empty());
        assert!(fresh.tax_info.is_none());
        assert!(fresh.description.is_empty());
    }

    #[test]
    fn test_validation_reports_most_fundamental_blocker_first() {
        let mut session = seeded().set_description("Dinner").split_all_equally();

        session.payer = None;
        assert_eq!(session.validate_for_submission(), Err(SubmitBlocker::NoPayer));

        session.payer = Some("a".into());
        session.tax_info = None;
        assert_eq!(session.validate_for_submission(), Err(SubmitBlocker::NoTaxInfo));

        session = seeded().split_all_equally();
        session.description = "   ".into();
        assert_eq!(
            session.validate_for_submission(),
            Err(SubmitBlocker::NoDescription)
        );
    }

    #[test]
    fn test_validation_blocks_incomplete_assignment() {
        let session = seeded().set_description("Dinner").toggle_assignment("1", "a");
        assert_eq!(
            session.validate_for_submission(),
            Err(SubmitBlocker::NotFullyAssigned)
        );
    }

    #[test]
    fn test_validation_passes_when_everything_is_set() {
        let session = seeded().set_description("Dinner").split_all_equally();
        assert_eq!(session.validate_for_submission(), Ok(()));
    }

    #[test]
    fn test_expense_request_payer_fronts_total() {
        let session = seeded()
            .set_group("35")
            .set_description("Dinner")
            .assign_all_to_one("b");

        let req = session.build_expense_request().unwrap();
        assert_eq!(req.description, "Dinner");
        assert_eq!(req.payer, "a");
        assert_eq!(req.total_amount, 10.80);
        assert_eq!(req.tax, 0.80);
        assert_eq!(req.group_id, "35");
        assert_eq!(req.receipt_path, "receipts/r1.jpg");

        let alice = &req.user_splits[0];
        assert_eq!(alice.paid, 10.80);
        assert_eq!(alice.owed, 0.0);

        let bob = &req.user_splits[1];
        assert_eq!(bob.paid, 0.0);
        assert_eq!(bob.owed, 10.80); // $10 of items + all the tax
    }

    #[test]
    fn test_expense_request_blocked_while_incomplete() {
        let session = seeded().set_description("Dinner");
        assert_eq!(
            session.build_expense_request(),
            Err(SubmitBlocker::NotFullyAssigned)
        );
    }
}
