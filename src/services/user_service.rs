use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::hash_pin;
use crate::error::Result;
use crate::models::User;

pub async fn find_by_name(db: &PgPool, name: &str) -> Result<Option<User>> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE name = $1")
        .bind(name)
        .fetch_optional(db)
        .await?;

    Ok(user)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?;

    Ok(user)
}

/// Upserts the fixed user population. There is no sign-up flow; this runs
/// once at startup. Existing users keep their stored hash so PINs are only
/// hashed for names not seen before.
pub async fn seed_users(db: &PgPool, seed: &[(String, String)]) -> Result<()> {
    for (name, pin) in seed {
        if find_by_name(db, name).await?.is_some() {
            continue;
        }

        let pin_hash = hash_pin(pin)?;
        sqlx::query(
            "INSERT INTO users (id, name, pin_hash) VALUES ($1, $2, $3) ON CONFLICT (name) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(&pin_hash)
        .execute(db)
        .await?;

        tracing::info!("Seeded user {}", name);
    }

    Ok(())
}
