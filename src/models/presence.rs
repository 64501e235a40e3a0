use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Sessions with a heartbeat inside this window count as online.
pub const ONLINE_WINDOW_SECS: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OnlineUser {
    pub id: Uuid,
    pub username: String,
    pub session_id: String,
    pub last_seen: DateTime<Utc>,
}

// Heartbeat: upserted by session id.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct HeartbeatRequest {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(length(min = 1, max = 200))]
    pub session_id: String,
}
