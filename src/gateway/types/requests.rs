//! Request bodies for the session mutation routes.

use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `PUT /session/items/{item_id}/shares/{user_id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateShareRequest {
    /// Raw percentage from the edit control; rounded to a whole number
    /// and capped so the item's sum cannot exceed 100
    #[schema(example = 37.5)]
    pub percentage: f64,
}

/// Body of `PUT /session/payer`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetPayerRequest {
    #[schema(example = "1042")]
    pub user_id: String,
}

/// Body of `PUT /session/description`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetDescriptionRequest {
    #[schema(example = "Saturday groceries")]
    pub description: String,
}

/// Body of `PUT /session/group`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetGroupRequest {
    #[schema(example = "35")]
    pub group_id: String,
}
