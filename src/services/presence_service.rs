use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{HeartbeatRequest, ONLINE_WINDOW_SECS, OnlineUser};

pub async fn heartbeat(db: &PgPool, req: &HeartbeatRequest) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO online_users (id, username, session_id, last_seen)
        VALUES ($1, $2, $3, NOW())
        ON CONFLICT (session_id)
        DO UPDATE SET username = EXCLUDED.username, last_seen = NOW()
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&req.username)
    .bind(&req.session_id)
    .execute(db)
    .await?;

    Ok(())
}

/// Sessions seen inside the freshness window, most recent first.
pub async fn online_users(db: &PgPool) -> Result<Vec<OnlineUser>> {
    let cutoff = Utc::now() - Duration::seconds(ONLINE_WINDOW_SECS);

    let users: Vec<OnlineUser> =
        sqlx::query_as("SELECT * FROM online_users WHERE last_seen >= $1 ORDER BY last_seen DESC")
            .bind(cutoff)
            .fetch_all(db)
            .await?;

    Ok(users)
}
