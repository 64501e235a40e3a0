use axum::{extract::State, response::Json};
use validator::Validate;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{VoteOutcome, VoteRequest},
    services::{item_service, vote_service},
};

pub async fn toggle_vote(
    State(state): State<AppState>,
    Json(payload): Json<VoteRequest>,
) -> Result<Json<VoteOutcome>> {
    payload.validate()?;

    // Verify the target item exists
    if !item_service::item_exists(&state.db, payload.item_type, payload.item_id).await? {
        return Err(AppError::NotFound(format!(
            "{} not found",
            payload.item_type.as_str()
        )));
    }

    let outcome = vote_service::toggle_vote(&state.db, &payload).await?;

    Ok(Json(outcome))
}
