use axum::{http::header, response::Json};
use serde_json::{Value, json};

/// Version probe for the client's update check. Served with caching
/// disabled so clients always see the currently deployed build.
pub async fn version() -> ([(header::HeaderName, &'static str); 1], Json<Value>) {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(json!({ "version": env!("CARGO_PKG_VERSION") })),
    )
}
