//! Receipt upload handler: multipart passthrough to the extraction
//! service, then session seeding from the flattened result.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
};

use super::super::client::{AnalyzedReceipts, UploadFile};
use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, SessionSnapshot, error_codes};

/// Analyze uploaded receipt images
///
/// POST /api/v1/receipts/analyze (multipart)
///
/// Forwards every `files` part to the extraction service together with the
/// selected `groupId`, then replaces the working session with the new
/// roster and item set (all items unassigned). Extraction failures surface
/// as a generic error; there is nothing useful to fall back to.
#[utoipa::path(
    post,
    path = "/api/v1/receipts/analyze",
    request_body(content = Vec<u8>, description = "multipart form: `files` (one or more images), optional `groupId`", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Session seeded from extraction result", body = SessionSnapshot),
        (status = 400, description = "No files provided"),
        (status = 502, description = "Extraction service failed")
    ),
    tag = "Receipts"
)]
pub async fn analyze_receipts(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<SessionSnapshot> {
    let mut files: Vec<UploadFile> = Vec::new();
    let mut group_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart payload: {}", e)))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("files") => {
                let file_name = field.file_name().unwrap_or("receipt").to_string();
                let content_type = field.content_type().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("unreadable file part: {}", e)))?;
                files.push(UploadFile {
                    bytes: bytes.to_vec(),
                    file_name,
                    content_type,
                });
            }
            Some("groupId") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("unreadable groupId: {}", e)))?;
                group_id = Some(text);
            }
            _ => {}
        }
    }

    if files.is_empty() {
        return ApiError::new(
            StatusCode::BAD_REQUEST,
            error_codes::NO_FILES_PROVIDED,
            "No files provided",
        )
        .into_err();
    }

    let group = group_id.unwrap_or_else(|| state.session().group_id);
    let file_count = files.len();

    let wire = state
        .upstream
        .analyze_receipts(files, &group)
        .await
        .map_err(|e| {
            tracing::error!("receipt extraction failed ({} files): {}", file_count, e);
            ApiError::new(
                StatusCode::BAD_GATEWAY,
                error_codes::EXTRACTION_FAILED,
                "Failed to process images",
            )
        })?;

    let seed = AnalyzedReceipts::from(wire);
    tracing::info!(
        "extraction round: {} users, {} items, subtotal {}",
        seed.users.len(),
        seed.items.len(),
        seed.subtotal
    );

    let next = state.commit(|s| {
        s.set_group(&group).begin(
            seed.users,
            seed.items,
            Some(seed.tax_info),
            Some(seed.subtotal),
            Some(seed.total),
            seed.primary_receipt_path,
            seed.all_receipt_paths,
        )
    });

    ok_snapshot(&next)
}

fn ok_snapshot(session: &crate::session::SplitSession) -> ApiResult<SessionSnapshot> {
    super::super::types::ok(SessionSnapshot::from_session(session))
}
