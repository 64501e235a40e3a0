use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::EntityId;
use super::item::ItemType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: EntityId,
    pub username: String,
    pub content: String,
    pub item_type: ItemType,
    pub item_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// Create comment request
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(length(min = 1, max = 10000))]
    pub content: String,
    pub item_type: ItemType,
    pub item_id: Uuid,
}

// Update comment request; only the authoring username may edit.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    pub id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(length(min = 1, max = 10000))]
    pub content: String,
}
