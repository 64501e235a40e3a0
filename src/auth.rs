use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::Result};

pub const SESSION_COOKIE: &str = "trip_session";

/// Signed session payload carried in the cookie. The signature is what
/// keeps a client from minting a session for another user.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String, // user_id
    pub name: String,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(user_id: Uuid, name: String, session_secret: &str) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::days(30);

        let claims = Self {
            sub: user_id.to_string(),
            name,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(session_secret.as_ref()),
        )?;

        Ok(token)
    }

    pub fn verify(token: &str, session_secret: &str) -> Result<Self> {
        let token_data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(session_secret.as_ref()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[derive(Debug)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub name: String,
}

/// Extracts the session user from the cookie if one is present and valid.
/// A missing or bad cookie is not an error; `/api/auth/me` reports null.
#[derive(Debug)]
pub struct OptionalSessionUser(pub Option<SessionUser>);

impl FromRequestParts<AppState> for OptionalSessionUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(OptionalSessionUser(None));
        };

        let Ok(claims) = SessionClaims::verify(cookie.value(), &state.config.session_secret) else {
            return Ok(OptionalSessionUser(None));
        };

        let Ok(user_id) = Uuid::parse_str(&claims.sub) else {
            return Ok(OptionalSessionUser(None));
        };

        Ok(OptionalSessionUser(Some(SessionUser {
            user_id,
            name: claims.name,
        })))
    }
}

// PIN hashing utilities
pub fn hash_pin(pin: &str) -> Result<String> {
    let cost = 12;
    bcrypt::hash(pin, cost).map_err(Into::into)
}

pub fn verify_pin(pin: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(pin, hash).map_err(Into::into)
}
