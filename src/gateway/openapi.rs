//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::allocation::{AllocationState, ItemAllocation, Share};
use crate::gateway::handlers::{ExpenseResponseData, GroupsData, HealthResponse};
use crate::gateway::types::{
    ItemView, SessionSnapshot, SetDescriptionRequest, SetGroupRequest, SetPayerRequest,
    UnassignedData, UpdateShareRequest, UserSummaryRow,
};
use crate::models::{Group, TaxInfo, User};

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Splitflow API",
        version = "1.0.0",
        description = "Receipt-splitting backend: upload receipts, allocate item shares across a group, submit the finalized expense to the ledger.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::receipts::analyze_receipts,
        crate::gateway::handlers::groups::list_groups,
        crate::gateway::handlers::expenses::create_expense,
        crate::gateway::handlers::session::get_session,
        crate::gateway::handlers::session::reset_session,
        crate::gateway::handlers::session::toggle_share,
        crate::gateway::handlers::session::update_share,
        crate::gateway::handlers::session::distribute_item,
        crate::gateway::handlers::session::balance_item,
        crate::gateway::handlers::session::assign_all,
        crate::gateway::handlers::session::split_all,
        crate::gateway::handlers::session::set_payer,
        crate::gateway::handlers::session::set_description,
        crate::gateway::handlers::session::set_group,
    ),
    components(
        schemas(
            HealthResponse,
            GroupsData,
            ExpenseResponseData,
            SessionSnapshot,
            ItemView,
            UserSummaryRow,
            UnassignedData,
            UpdateShareRequest,
            SetPayerRequest,
            SetDescriptionRequest,
            SetGroupRequest,
            ItemAllocation,
            AllocationState,
            Share,
            User,
            Group,
            TaxInfo,
        )
    ),
    tags(
        (name = "System", description = "Service health"),
        (name = "Receipts", description = "Receipt upload and extraction"),
        (name = "Groups", description = "Expense group directory"),
        (name = "Session", description = "Share allocation session"),
        (name = "Expenses", description = "Finalized expense submission"),
    )
)]
pub struct ApiDoc;
