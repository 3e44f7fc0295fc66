//! Derived session views returned by every session route.
//!
//! The snapshot is rebuilt from the session record on every request;
//! nothing in here is cached between mutations.

use rust_decimal::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::allocation::{AllocationState, ItemAllocation, Share};
use crate::models::{TaxInfo, User};
use crate::money;
use crate::session::SplitSession;

/// One item with its shares and derived classification.
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemView {
    #[schema(example = "0_2")]
    pub id: String,
    #[schema(example = "Oat milk")]
    pub name: String,
    #[schema(example = "$4.25")]
    pub price: String,
    pub shares: Vec<Share>,
    pub state: AllocationState,
    /// Sum of share percentages, for imbalance display
    #[schema(example = "100")]
    pub total_percentage: Decimal,
}

impl From<&ItemAllocation> for ItemView {
    fn from(item: &ItemAllocation) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price.clone(),
            shares: item.shares.clone(),
            state: item.state(),
            total_percentage: item.total_percentage(),
        }
    }
}

/// Per-user money breakdown row.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummaryRow {
    #[schema(example = "1042")]
    pub user_id: String,
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = "#ef4444")]
    pub color: String,
    pub is_payer: bool,
    /// Items on which the user holds any share
    #[schema(example = 3)]
    pub item_count: usize,
    #[schema(example = "5.00")]
    pub subtotal: String,
    #[schema(example = "0.40")]
    pub tax_share: String,
    #[schema(example = "5.40")]
    pub total: String,
}

/// Items nobody has claimed yet.
#[derive(Debug, Serialize, ToSchema)]
pub struct UnassignedData {
    #[schema(example = 1)]
    pub count: usize,
    #[schema(example = "4.25")]
    pub total: String,
}

/// Full derived view of the current session.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionSnapshot {
    pub users: Vec<User>,
    pub items: Vec<ItemView>,
    pub tax: Option<TaxInfo>,
    pub subtotal: Option<String>,
    pub total: Option<String>,
    pub payer: Option<String>,
    pub description: String,
    pub group_id: String,
    /// 0..=100, share of items fully balanced
    #[schema(example = 66.7)]
    pub progress: f64,
    pub fully_assigned: bool,
    pub summary: Vec<UserSummaryRow>,
    pub unassigned: UnassignedData,
}

impl SessionSnapshot {
    pub fn from_session(session: &SplitSession) -> Self {
        let agg = session.aggregator();

        let summary = session
            .users
            .iter()
            .map(|user| UserSummaryRow {
                user_id: user.id.clone(),
                name: user.name.clone(),
                color: user.color.clone(),
                is_payer: session.payer.as_deref() == Some(user.id.as_str()),
                item_count: agg.item_count(&user.id),
                subtotal: money::format_amount(agg.user_subtotal(&user.id)),
                tax_share: money::format_amount(agg.user_tax_share(&user.id)),
                total: money::format_amount(agg.user_total(&user.id)),
            })
            .collect();

        let unassigned = UnassignedData {
            count: agg.unassigned_items().len(),
            total: money::format_amount(agg.unassigned_total()),
        };

        Self {
            users: session.users.clone(),
            items: session.items.iter().map(ItemView::from).collect(),
            tax: session.tax_info.clone(),
            subtotal: session.subtotal.clone(),
            total: session.total.clone(),
            payer: session.payer.clone(),
            description: session.description.clone(),
            group_id: session.group_id.clone(),
            progress: session.assignment_progress().to_f64().unwrap_or_default(),
            fully_assigned: session.is_fully_assigned(),
            summary,
            unassigned,
        }
    }
}
