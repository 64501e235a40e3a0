use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{Comment, CreateCommentRequest, ItemType, UpdateCommentRequest},
    services::{comment_service, item_service},
};

#[derive(Debug, Deserialize)]
pub struct GetCommentsQuery {
    pub item_type: ItemType,
    pub item_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCommentQuery {
    pub id: Uuid,
    pub username: String,
}

pub async fn get_comments(
    State(state): State<AppState>,
    Query(params): Query<GetCommentsQuery>,
) -> Result<Json<Vec<Comment>>> {
    let comments = comment_service::list_comments(&state.db, params.item_type, params.item_id).await?;
    Ok(Json(comments))
}

pub async fn create_comment(
    State(state): State<AppState>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<Json<Comment>> {
    payload.validate()?;

    // Verify the target item exists
    if !item_service::item_exists(&state.db, payload.item_type, payload.item_id).await? {
        return Err(AppError::NotFound(format!(
            "{} not found",
            payload.item_type.as_str()
        )));
    }

    let comment = comment_service::create_comment(&state.db, &payload).await?;

    Ok(Json(comment))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Json(payload): Json<UpdateCommentRequest>,
) -> Result<Json<Comment>> {
    payload.validate()?;

    let comment = comment_service::update_comment(&state.db, &payload).await?;

    Ok(Json(comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Query(params): Query<DeleteCommentQuery>,
) -> Result<Json<Value>> {
    comment_service::delete_comment(&state.db, params.id, &params.username).await?;

    Ok(Json(json!({ "success": true })))
}
