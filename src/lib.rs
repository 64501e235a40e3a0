pub mod auth;
pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod pricing;
pub mod services;

use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{ACCEPT, CONTENT_TYPE},
    },
    routing::{get, post},
};
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
}

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .allowed_origins
                .iter()
                .map(|origin| origin.parse::<HeaderValue>().unwrap())
                .collect::<Vec<_>>(),
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        // Auth routes
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/me", get(handlers::auth::me))
        // Trip item collections
        .route(
            "/api/flights",
            get(handlers::items::list_flights)
                .post(handlers::items::create_flight)
                .put(handlers::items::update_flight)
                .delete(handlers::items::delete_flight),
        )
        .route(
            "/api/hotels",
            get(handlers::items::list_hotels)
                .post(handlers::items::create_hotel)
                .put(handlers::items::update_hotel)
                .delete(handlers::items::delete_hotel),
        )
        .route(
            "/api/activities",
            get(handlers::items::list_activities)
                .post(handlers::items::create_activity)
                .put(handlers::items::update_activity)
                .delete(handlers::items::delete_activity),
        )
        .route(
            "/api/restaurants",
            get(handlers::items::list_restaurants)
                .post(handlers::items::create_restaurant)
                .put(handlers::items::update_restaurant)
                .delete(handlers::items::delete_restaurant),
        )
        // Votes and comments
        .route("/api/votes", post(handlers::votes::toggle_vote))
        .route(
            "/api/comments",
            get(handlers::comments::get_comments)
                .post(handlers::comments::create_comment)
                .patch(handlers::comments::update_comment)
                .delete(handlers::comments::delete_comment),
        )
        // Presence
        .route(
            "/api/presence",
            get(handlers::presence::online_users).post(handlers::presence::heartbeat),
        )
        // Version probe
        .route("/api/version", get(handlers::version::version))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
