use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Comment, CreateCommentRequest, ItemType, UpdateCommentRequest};

pub async fn list_comments(db: &PgPool, item_type: ItemType, item_id: Uuid) -> Result<Vec<Comment>> {
    let comments: Vec<Comment> = sqlx::query_as(
        "SELECT * FROM comments WHERE item_type = $1 AND item_id = $2 ORDER BY created_at ASC",
    )
    .bind(item_type)
    .bind(item_id)
    .fetch_all(db)
    .await?;

    Ok(comments)
}

pub async fn create_comment(db: &PgPool, req: &CreateCommentRequest) -> Result<Comment> {
    let comment: Comment = sqlx::query_as(
        r#"
        INSERT INTO comments (id, username, content, item_type, item_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&req.username)
    .bind(&req.content)
    .bind(req.item_type)
    .bind(req.item_id)
    .fetch_one(db)
    .await?;

    Ok(comment)
}

async fn get_comment(db: &PgPool, id: Uuid) -> Result<Comment> {
    let comment: Option<Comment> = sqlx::query_as("SELECT * FROM comments WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?;

    comment.ok_or_else(|| AppError::NotFound("Comment not found".to_string()))
}

pub async fn update_comment(db: &PgPool, req: &UpdateCommentRequest) -> Result<Comment> {
    let existing = get_comment(db, req.id).await?;

    if existing.username != req.username {
        return Err(AppError::Authorization(
            "You can only edit your own comments".to_string(),
        ));
    }

    let comment: Comment =
        sqlx::query_as("UPDATE comments SET content = $2 WHERE id = $1 RETURNING *")
            .bind(req.id)
            .bind(&req.content)
            .fetch_one(db)
            .await?;

    Ok(comment)
}

pub async fn delete_comment(db: &PgPool, id: Uuid, username: &str) -> Result<()> {
    let existing = get_comment(db, id).await?;

    if existing.username != username {
        return Err(AppError::Authorization(
            "You can only delete your own comments".to_string(),
        ));
    }

    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;

    Ok(())
}
