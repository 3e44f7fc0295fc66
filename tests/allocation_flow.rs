//! End-to-end allocation scenarios over the public library API:
//! seed a session the way an extraction round would, drive the operators,
//! and check the derived money amounts and the submission gate.

use rust_decimal::Decimal;
use splitflow::{ItemAllocation, SplitSession, SubmitBlocker, TaxInfo, User};

/// Helper: session seeded like a finished extraction round.
fn seeded_session(items: Vec<ItemAllocation>, tax: &str, subtotal: &str, total: &str) -> SplitSession {
    let users = vec![
        User::new("a", "Alice", 0),
        User::new("b", "Bob", 1),
        User::new("c", "Cara", 2),
    ];
    SplitSession::default().begin(
        users,
        items,
        Some(TaxInfo { rate: 0.08, amount: tax.into() }),
        Some(subtotal.into()),
        Some(total.into()),
        Some("receipts/primary.jpg".into()),
        vec!["receipts/primary.jpg".into()],
    )
}

fn share_percentages(session: &SplitSession, item_id: &str) -> Vec<(String, Decimal)> {
    session
        .items
        .iter()
        .find(|i| i.id == item_id)
        .map(|i| {
            i.shares
                .iter()
                .map(|s| (s.user_id.clone(), s.percentage))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn qa_thirty_dollar_item_three_way_split() {
    // 1 item at $30.00, 3 users -> 34/33/33, exact sum 100
    let session = seeded_session(
        vec![ItemAllocation::new("1", "Platter", "$30.00")],
        "0.00",
        "30.00",
        "30.00",
    );

    let session = session.split_all_equally();
    assert_eq!(
        share_percentages(&session, "1"),
        vec![
            ("a".to_string(), Decimal::from(34)),
            ("b".to_string(), Decimal::from(33)),
            ("c".to_string(), Decimal::from(33)),
        ]
    );
    assert_eq!(session.items[0].total_percentage(), Decimal::from(100));
    assert!(session.is_fully_assigned());
}

#[test]
fn qa_half_share_subtotal_tax_and_total() {
    // $9.99 item split 50/50, $0.80 tax over a $9.99 subtotal
    let session = seeded_session(
        vec![ItemAllocation::new("1", "Pizza", "$9.99")],
        "0.80",
        "9.99",
        "10.79",
    );
    let session = session
        .toggle_assignment("1", "a")
        .toggle_assignment("1", "b");

    let agg = session.aggregator();
    assert_eq!(agg.user_subtotal("a"), Decimal::new(500, 2)); // 5.00
    assert_eq!(agg.user_tax_share("a"), Decimal::new(40, 2)); // 0.40
    assert_eq!(agg.user_total("a"), Decimal::new(540, 2)); // 5.40
}

#[test]
fn qa_toggle_round_trip_restores_full_share() {
    // {Y:100} -> toggle X on -> {Y:50, X:50} -> toggle X off -> {Y:100}
    let session = seeded_session(
        vec![ItemAllocation::new("1", "Salad", "$8.00")],
        "0.00",
        "8.00",
        "8.00",
    );

    let session = session.toggle_assignment("1", "a");
    assert_eq!(
        share_percentages(&session, "1"),
        vec![("a".to_string(), Decimal::from(100))]
    );

    let session = session.toggle_assignment("1", "b");
    let fifty = Decimal::from(100) / Decimal::from(2);
    assert_eq!(
        share_percentages(&session, "1"),
        vec![("a".to_string(), fifty), ("b".to_string(), fifty)]
    );

    let session = session.toggle_assignment("1", "b");
    assert_eq!(
        share_percentages(&session, "1"),
        vec![("a".to_string(), Decimal::from(100))]
    );
}

#[test]
fn qa_progress_tracks_balanced_items_only() {
    let session = seeded_session(
        vec![
            ItemAllocation::new("1", "Coffee", "$3.00"),
            ItemAllocation::new("2", "Bagel", "$2.00"),
        ],
        "0.00",
        "5.00",
        "5.00",
    );

    assert_eq!(session.assignment_progress(), Decimal::ZERO);
    assert!(!session.is_fully_assigned());

    let session = session.toggle_assignment("1", "a");
    assert_eq!(session.assignment_progress(), Decimal::from(50));

    let session = session.toggle_assignment("2", "b");
    assert_eq!(session.assignment_progress(), Decimal::from(100));
    assert!(session.is_fully_assigned());
}

#[test]
fn qa_manual_edits_can_never_oversubscribe_an_item() {
    let session = seeded_session(
        vec![ItemAllocation::new("1", "Wine", "$24.00")],
        "0.00",
        "24.00",
        "24.00",
    );
    let mut session = session.split_all_equally();

    for (user, raw) in [("a", 90.0), ("b", 90.0), ("c", 90.0), ("a", 120.0)] {
        session = session.update_share_percentage("1", user, raw);
        assert!(
            session.items[0].total_percentage() <= Decimal::from(100),
            "sum exceeded 100 after setting {} to {}",
            user,
            raw
        );
    }
}

#[test]
fn qa_balance_then_submit_flow() {
    let session = seeded_session(
        vec![ItemAllocation::new("1", "Ramen", "$12.00")],
        "0.96",
        "12.00",
        "12.96",
    );

    // Manual partial assignment drifts below 100, balance repairs it
    let session = session
        .toggle_assignment("1", "a")
        .toggle_assignment("1", "b")
        .update_share_percentage("1", "a", 20.0)
        .update_share_percentage("1", "b", 30.0);
    assert!(!session.is_fully_assigned());

    let session = session.balance_remaining_percentage("1");
    assert_eq!(session.items[0].total_percentage(), Decimal::from(100));

    // Still blocked on the description, then submit-ready
    assert_eq!(
        session.validate_for_submission(),
        Err(SubmitBlocker::NoDescription)
    );
    let session = session.set_description("Ramen night");
    assert_eq!(session.validate_for_submission(), Ok(()));

    let expense = session.build_expense_request().unwrap();
    assert_eq!(expense.total_amount, 12.96);
    assert_eq!(expense.tax, 0.96);
    assert_eq!(expense.user_splits.len(), 3);

    // Payer (defaulted to the first roster user) fronts the whole bill
    let payer_split = expense.user_splits.iter().find(|s| s.id == "a").unwrap();
    assert_eq!(payer_split.paid, 12.96);

    // Owed amounts follow the 45/55 share split plus proportional tax
    let owed: f64 = expense.user_splits.iter().map(|s| s.owed).sum();
    assert!((owed - 12.96).abs() < 0.02);
}

#[test]
fn qa_unassigned_item_blocks_submission() {
    let session = seeded_session(
        vec![
            ItemAllocation::new("1", "Coffee", "$3.00"),
            ItemAllocation::new("2", "Bagel", "$2.00"),
        ],
        "0.00",
        "5.00",
        "5.00",
    )
    .set_description("Breakfast")
    .toggle_assignment("1", "a");

    assert_eq!(
        session.validate_for_submission(),
        Err(SubmitBlocker::NotFullyAssigned)
    );

    // Unassigned rollup names the missing money
    let agg = session.aggregator();
    assert_eq!(agg.unassigned_items().len(), 1);
    assert_eq!(agg.unassigned_total(), Decimal::new(200, 2));
}

#[test]
fn qa_assign_all_then_new_round_resets_items_keeps_roster() {
    let session = seeded_session(
        vec![ItemAllocation::new("1", "Sushi", "$40.00")],
        "0.00",
        "40.00",
        "40.00",
    )
    .set_payer("b")
    .assign_all_to_one("c");

    assert!(session.is_fully_assigned());

    let next_round = session.begin(
        session.users.clone(),
        vec![ItemAllocation::new("9", "Tea", "$2.00")],
        None,
        None,
        None,
        None,
        Vec::new(),
    );

    assert_eq!(next_round.payer.as_deref(), Some("b"));
    assert!(!next_round.items[0].is_assigned());
    assert!(!next_round.is_fully_assigned());
}
