use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Vote, VoteAction, VoteOutcome, VoteRequest};

/// Toggle protocol: no vote -> create, same type -> remove, other type ->
/// switch. Runs in a transaction so the lookup and the write agree; the
/// unique (username, item_type, item_id) constraint backs the one-vote
/// invariant.
pub async fn toggle_vote(db: &PgPool, req: &VoteRequest) -> Result<VoteOutcome> {
    let mut tx = db.begin().await?;

    let existing: Option<Vote> = sqlx::query_as(
        "SELECT * FROM votes WHERE username = $1 AND item_type = $2 AND item_id = $3",
    )
    .bind(&req.username)
    .bind(req.item_type)
    .bind(req.item_id)
    .fetch_optional(&mut *tx)
    .await?;

    let action = match existing {
        Some(vote) if vote.vote_type == req.vote_type => {
            sqlx::query("DELETE FROM votes WHERE username = $1 AND item_type = $2 AND item_id = $3")
                .bind(&req.username)
                .bind(req.item_type)
                .bind(req.item_id)
                .execute(&mut *tx)
                .await?;

            VoteAction::Removed
        }
        Some(_) => {
            sqlx::query(
                "UPDATE votes SET vote_type = $4 WHERE username = $1 AND item_type = $2 AND item_id = $3",
            )
            .bind(&req.username)
            .bind(req.item_type)
            .bind(req.item_id)
            .bind(req.vote_type)
            .execute(&mut *tx)
            .await?;

            VoteAction::Updated
        }
        None => {
            sqlx::query(
                r#"
                INSERT INTO votes (id, username, vote_type, item_type, item_id)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&req.username)
            .bind(req.vote_type)
            .bind(req.item_type)
            .bind(req.item_id)
            .execute(&mut *tx)
            .await?;

            VoteAction::Created
        }
    };

    tx.commit().await?;

    Ok(VoteOutcome { action })
}
