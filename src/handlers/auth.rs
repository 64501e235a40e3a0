use axum::{extract::State, response::Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

use crate::{
    AppState,
    auth::{OptionalSessionUser, SESSION_COOKIE, SessionClaims, verify_pin},
    error::{AppError, Result},
    models::{LoginRequest, LoginResponse, UserSummary},
    services::user_service,
};

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    payload.validate()?;

    let user = user_service::find_by_name(&state.db, &payload.name)
        .await?
        .ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

    if !verify_pin(&payload.pin, &user.pin_hash)? {
        return Err(AppError::Authentication("Invalid credentials".to_string()));
    }

    let token = SessionClaims::new(user.id, user.name.clone(), &state.config.session_secret)?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build();

    tracing::info!("User {} logged in", user.name);

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            success: true,
            user: UserSummary::from(&user),
        }),
    ))
}

/// Current user or null. The token is signature-checked by the extractor;
/// the user is then resolved by id so a stale cookie for a removed user
/// reads as logged out.
pub async fn me(
    State(state): State<AppState>,
    session: OptionalSessionUser,
) -> Result<Json<Option<UserSummary>>> {
    let Some(session_user) = session.0 else {
        return Ok(Json(None));
    };

    let user = user_service::find_by_id(&state.db, session_user.user_id).await?;

    Ok(Json(user.as_ref().map(UserSummary::from)))
}
