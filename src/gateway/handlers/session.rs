//! Session routes: the derived snapshot plus one route per allocation
//! operator.
//!
//! Engine edge policy carries through to the wire: a mutation naming an
//! unknown item or user id leaves the record unchanged and still answers
//! 200 with the (identical) snapshot.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::session::{MAX_DESCRIPTION_LEN, SplitSession};

use super::super::state::AppState;
use super::super::types::{
    ApiError, ApiResult, SessionSnapshot, SetDescriptionRequest, SetGroupRequest, SetPayerRequest,
    UpdateShareRequest, ok,
};

fn snapshot(session: &SplitSession) -> ApiResult<SessionSnapshot> {
    ok(SessionSnapshot::from_session(session))
}

/// Current session snapshot
///
/// GET /api/v1/session
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses((status = 200, description = "Derived session view", body = SessionSnapshot)),
    tag = "Session"
)]
pub async fn get_session(State(state): State<Arc<AppState>>) -> ApiResult<SessionSnapshot> {
    snapshot(&state.session())
}

/// Reset the working set (roster and payer survive)
///
/// DELETE /api/v1/session
#[utoipa::path(
    delete,
    path = "/api/v1/session",
    responses((status = 200, description = "Session cleared", body = SessionSnapshot)),
    tag = "Session"
)]
pub async fn reset_session(State(state): State<Arc<AppState>>) -> ApiResult<SessionSnapshot> {
    snapshot(&state.commit(|s| s.reset()))
}

/// Toggle a user on or off an item
///
/// POST /api/v1/session/items/{item_id}/toggle/{user_id}
#[utoipa::path(
    post,
    path = "/api/v1/session/items/{item_id}/toggle/{user_id}",
    params(
        ("item_id" = String, Path, description = "Item id"),
        ("user_id" = String, Path, description = "User id")
    ),
    responses((status = 200, description = "Post-toggle snapshot", body = SessionSnapshot)),
    tag = "Session"
)]
pub async fn toggle_share(
    State(state): State<Arc<AppState>>,
    Path((item_id, user_id)): Path<(String, String)>,
) -> ApiResult<SessionSnapshot> {
    snapshot(&state.commit(|s| s.toggle_assignment(&item_id, &user_id)))
}

/// Set one user's percentage on one item
///
/// PUT /api/v1/session/items/{item_id}/shares/{user_id}
#[utoipa::path(
    put,
    path = "/api/v1/session/items/{item_id}/shares/{user_id}",
    params(
        ("item_id" = String, Path, description = "Item id"),
        ("user_id" = String, Path, description = "User id")
    ),
    request_body = UpdateShareRequest,
    responses((status = 200, description = "Post-edit snapshot", body = SessionSnapshot)),
    tag = "Session"
)]
pub async fn update_share(
    State(state): State<Arc<AppState>>,
    Path((item_id, user_id)): Path<(String, String)>,
    Json(req): Json<UpdateShareRequest>,
) -> ApiResult<SessionSnapshot> {
    snapshot(&state.commit(|s| s.update_share_percentage(&item_id, &user_id, req.percentage)))
}

/// Reset one item to an exact integer equal split
///
/// POST /api/v1/session/items/{item_id}/distribute
#[utoipa::path(
    post,
    path = "/api/v1/session/items/{item_id}/distribute",
    params(("item_id" = String, Path, description = "Item id")),
    responses((status = 200, description = "Post-distribute snapshot", body = SessionSnapshot)),
    tag = "Session"
)]
pub async fn distribute_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
) -> ApiResult<SessionSnapshot> {
    snapshot(&state.commit(|s| s.distribute_equally(&item_id)))
}

/// Spread the gap to 100% over the item's current distribution
///
/// POST /api/v1/session/items/{item_id}/balance
#[utoipa::path(
    post,
    path = "/api/v1/session/items/{item_id}/balance",
    params(("item_id" = String, Path, description = "Item id")),
    responses((status = 200, description = "Post-balance snapshot", body = SessionSnapshot)),
    tag = "Session"
)]
pub async fn balance_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
) -> ApiResult<SessionSnapshot> {
    snapshot(&state.commit(|s| s.balance_remaining_percentage(&item_id)))
}

/// Hand every item to a single user
///
/// POST /api/v1/session/assign-all/{user_id}
#[utoipa::path(
    post,
    path = "/api/v1/session/assign-all/{user_id}",
    params(("user_id" = String, Path, description = "User id")),
    responses((status = 200, description = "Post-assignment snapshot", body = SessionSnapshot)),
    tag = "Session"
)]
pub async fn assign_all(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<SessionSnapshot> {
    snapshot(&state.commit(|s| s.assign_all_to_one(&user_id)))
}

/// Split every item equally across the whole roster
///
/// POST /api/v1/session/split-all
#[utoipa::path(
    post,
    path = "/api/v1/session/split-all",
    responses((status = 200, description = "Post-split snapshot", body = SessionSnapshot)),
    tag = "Session"
)]
pub async fn split_all(State(state): State<Arc<AppState>>) -> ApiResult<SessionSnapshot> {
    snapshot(&state.commit(|s| s.split_all_equally()))
}

/// Select the payer
///
/// PUT /api/v1/session/payer
#[utoipa::path(
    put,
    path = "/api/v1/session/payer",
    request_body = SetPayerRequest,
    responses((status = 200, description = "Updated snapshot", body = SessionSnapshot)),
    tag = "Session"
)]
pub async fn set_payer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetPayerRequest>,
) -> ApiResult<SessionSnapshot> {
    snapshot(&state.commit(|s| s.set_payer(&req.user_id)))
}

/// Set the expense description
///
/// PUT /api/v1/session/description
#[utoipa::path(
    put,
    path = "/api/v1/session/description",
    request_body = SetDescriptionRequest,
    responses(
        (status = 200, description = "Updated snapshot", body = SessionSnapshot),
        (status = 400, description = "Description too long")
    ),
    tag = "Session"
)]
pub async fn set_description(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetDescriptionRequest>,
) -> ApiResult<SessionSnapshot> {
    if req.description.chars().count() > MAX_DESCRIPTION_LEN {
        return ApiError::bad_request(format!(
            "Description is too long (max {} characters)",
            MAX_DESCRIPTION_LEN
        ))
        .into_err();
    }

    snapshot(&state.commit(|s| s.set_description(&req.description)))
}

/// Select the expense group
///
/// PUT /api/v1/session/group
#[utoipa::path(
    put,
    path = "/api/v1/session/group",
    request_body = SetGroupRequest,
    responses((status = 200, description = "Updated snapshot", body = SessionSnapshot)),
    tag = "Session"
)]
pub async fn set_group(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetGroupRequest>,
) -> ApiResult<SessionSnapshot> {
    snapshot(&state.commit(|s| s.set_group(&req.group_id)))
}
