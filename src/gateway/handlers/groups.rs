//! Group directory proxy.
//!
//! Directory failures degrade silently to a static fallback set: the
//! user can always pick a group, unlike extraction where a failure has
//! nothing useful to fall back to.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use once_cell::sync::Lazy;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Group;

use super::super::state::AppState;
use super::super::types::{ApiResult, ok};

/// Served when the directory service is unreachable or returns garbage.
static FALLBACK_GROUPS: Lazy<BTreeMap<String, Group>> = Lazy::new(|| {
    [
        ("35", "Group #35"),
        ("47", "Group #47"),
        ("59664013", "9535K UT"),
        ("76698661", "9547 M"),
    ]
    .into_iter()
    .map(|(id, name)| (id.to_string(), Group { id: id.to_string(), name: name.to_string() }))
    .collect()
});

/// The static fallback group set (sentinel-free by construction).
pub fn fallback_groups() -> BTreeMap<String, Group> {
    FALLBACK_GROUPS.clone()
}

/// Selectable groups keyed by id.
#[derive(Debug, Serialize, ToSchema)]
pub struct GroupsData {
    pub groups: BTreeMap<String, Group>,
}

/// List selectable expense groups
///
/// GET /api/v1/groups
///
/// Proxies the external directory, filters the sentinel "Non-group
/// expenses" entry, and substitutes the fallback set on any failure
/// without surfacing an error.
#[utoipa::path(
    get,
    path = "/api/v1/groups",
    responses(
        (status = 200, description = "Selectable groups (fallback set on directory failure)", body = GroupsData)
    ),
    tag = "Groups"
)]
pub async fn list_groups(State(state): State<Arc<AppState>>) -> ApiResult<GroupsData> {
    let raw = match state.upstream.fetch_groups().await {
        Ok(groups) => groups,
        Err(e) => {
            tracing::warn!("group directory unavailable, serving fallback: {}", e);
            fallback_groups()
        }
    };

    let groups: BTreeMap<String, Group> =
        raw.into_iter().filter(|(_, g)| !g.is_sentinel()).collect();

    ok(GroupsData { groups })
}
