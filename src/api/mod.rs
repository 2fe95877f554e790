// HTTP API

pub mod integrations;

pub use integrations::{create_integration_router, IntegrationAppState};

use anyhow::{Context, Result};
use axum::{http::HeaderValue, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

/// GET /
async fn ping() -> Json<Value> {
    Json(json!({"Ping": "Pong"}))
}

/// Build the full application router with CORS for the given frontend origins.
pub fn create_app(state: IntegrationAppState, cors_origins: &[String]) -> Result<Router> {
    let origins = cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .route("/", get(ping))
        .merge(create_integration_router(state))
        .layer(cors))
}
