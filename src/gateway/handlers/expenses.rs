//! Expense submission: precondition gate, split assembly, ledger call.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, error_codes, ok};

/// Ledger submission outcome.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExpenseResponseData {
    #[schema(example = "8812")]
    pub expense_id: String,
    #[schema(example = "Expense created successfully with ID: 8812")]
    pub message: String,
}

/// Create the finalized expense
///
/// POST /api/v1/expenses
///
/// Validates every submission precondition against the current session
/// (payer, tax info, totals, description, full assignment) and reports the
/// first one missing without issuing the ledger call. On ledger success
/// the working set is cleared; roster and payer stay for the next round.
#[utoipa::path(
    post,
    path = "/api/v1/expenses",
    responses(
        (status = 200, description = "Expense recorded in the ledger", body = ExpenseResponseData),
        (status = 422, description = "A submission precondition is not met"),
        (status = 502, description = "Ledger service failed")
    ),
    tag = "Expenses"
)]
pub async fn create_expense(State(state): State<Arc<AppState>>) -> ApiResult<ExpenseResponseData> {
    let session = state.session();

    let expense = session
        .build_expense_request()
        .map_err(|blocker| ApiError::precondition(blocker.to_string()))?;

    tracing::info!(
        "submitting expense: {} splits, total {}, receipt path {:?}",
        expense.user_splits.len(),
        expense.total_amount,
        expense.receipt_path
    );

    let receipt = state.upstream.create_expense(&expense).await.map_err(|e| {
        tracing::error!("ledger submission failed: {}", e);
        ApiError::new(
            StatusCode::BAD_GATEWAY,
            error_codes::LEDGER_FAILED,
            "Failed to create expense",
        )
    })?;

    // Local state only resets once the ledger accepted the record
    state.commit(|s| s.reset());

    let expense_id = receipt
        .id
        .map(|id| id.to_id_string())
        .unwrap_or_else(|| "unknown".to_string());

    ok(ExpenseResponseData {
        message: format!("Expense created successfully with ID: {}", expense_id),
        expense_id,
    })
}
