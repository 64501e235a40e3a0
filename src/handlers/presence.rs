use axum::{extract::State, response::Json};
use serde_json::{Value, json};
use validator::Validate;

use crate::{
    AppState,
    error::Result,
    models::{HeartbeatRequest, OnlineUser},
    services::presence_service,
};

pub async fn online_users(State(state): State<AppState>) -> Result<Json<Vec<OnlineUser>>> {
    let users = presence_service::online_users(&state.db).await?;
    Ok(Json(users))
}

pub async fn heartbeat(
    State(state): State<AppState>,
    Json(payload): Json<HeartbeatRequest>,
) -> Result<Json<Value>> {
    payload.validate()?;

    presence_service::heartbeat(&state.db, &payload).await?;

    Ok(Json(json!({ "success": true })))
}
