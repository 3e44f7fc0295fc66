//! Domain models shared between the allocation engine and the gateway.
//!
//! Users and groups come from the extraction/directory services; the
//! expense types are the wire contract produced for the external ledger.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// Roster
// ============================================================================

/// Fixed display palette, assigned by roster position (cycling).
pub const USER_COLORS: [&str; 10] = [
    "#ef4444", // red
    "#10b981", // green
    "#8b5cf6", // purple
    "#f97316", // orange
    "#ec4899", // pink
    "#6366f1", // indigo
    "#14b8a6", // teal
    "#f59e0b", // amber
    "#06b6d4", // cyan
    "#d946ef", // fuchsia
];

/// Deterministic display color for a roster position.
pub fn color_for_index(index: usize) -> &'static str {
    USER_COLORS[index % USER_COLORS.len()]
}

/// A group member who can hold shares of receipt items.
///
/// Identity is `id`; the roster is immutable for the duration of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Member id from the directory service
    #[schema(example = "1042")]
    pub id: String,
    /// Display name
    #[schema(example = "Alice")]
    pub name: String,
    /// Display color, assigned from [`USER_COLORS`] by roster position
    #[schema(example = "#ef4444")]
    pub color: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, index: usize) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color_for_index(index).to_string(),
        }
    }
}

// ============================================================================
// Tax
// ============================================================================

/// Global tax figure for the whole receipt set (not per item).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TaxInfo {
    /// Effective rate (tax / subtotal), 0 when the subtotal is 0
    #[schema(example = 0.08)]
    pub rate: f64,
    /// Tax amount as a 2-decimal string
    #[schema(example = "0.80")]
    pub amount: String,
}

// ============================================================================
// Groups
// ============================================================================

/// Id of the sentinel "Non-group expenses" group, filtered before selection.
pub const NON_GROUP_ID: &str = "0";

/// An expense group from the directory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Group {
    #[schema(example = "35")]
    pub id: String,
    #[schema(example = "Flat 9B")]
    pub name: String,
}

impl Group {
    /// The sentinel pseudo-group must never be offered for selection.
    pub fn is_sentinel(&self) -> bool {
        self.id == NON_GROUP_ID || self.name.eq_ignore_ascii_case("non-group expenses")
    }
}

// ============================================================================
// Ledger wire contract
// ============================================================================

/// Per-user line of the finalized expense.
///
/// `paid` is the bill total for the payer and 0 for everyone else; `owed`
/// is the user's aggregated total including their tax share. The payer can
/// carry both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSplit {
    pub id: String,
    pub name: String,
    pub paid: f64,
    pub owed: f64,
}

/// Finalized expense record sent to the external ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRequest {
    pub description: String,
    pub payer: String,
    pub total_amount: f64,
    pub tax: f64,
    pub user_splits: Vec<UserSplit>,
    pub group_id: String,
    pub receipt_path: String,
}

// ============================================================================
// Unit Tests
// ============================================================================
