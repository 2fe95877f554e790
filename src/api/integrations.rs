//! HTTP endpoints for the HubSpot integration.
//!
//! - POST /integrations/hubspot/authorize      (form: user_id, org_id)
//! - GET  /integrations/hubspot/oauth2callback (query: code, state, error)
//! - POST /integrations/hubspot/credentials    (form: user_id, org_id)
//! - POST /integrations/hubspot/load           (form: credentials)

use crate::error::IntegrationError;
use crate::integrations::hubspot::CallbackParams;
use crate::integrations::{HubSpotIntegration, IntegrationItem};
use axum::{
    extract::{Query, State},
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Shared application state for integration endpoints
#[derive(Clone)]
pub struct IntegrationAppState {
    pub hubspot: Arc<HubSpotIntegration>,
}

/// Form identifying the (user, org) pair
#[derive(Deserialize)]
pub struct UserOrgForm {
    user_id: String,
    org_id: String,
}

/// Form carrying a credential blob from /credentials
#[derive(Deserialize)]
pub struct LoadItemsForm {
    credentials: String,
}

/// Create HubSpot integration router
pub fn create_integration_router(state: IntegrationAppState) -> Router {
    Router::new()
        .route("/integrations/hubspot/authorize", post(authorize))
        .route("/integrations/hubspot/oauth2callback", get(oauth2callback))
        .route("/integrations/hubspot/credentials", post(credentials))
        .route("/integrations/hubspot/load", post(load_items))
        .with_state(Arc::new(state))
}

/// POST /integrations/hubspot/authorize
///
/// Returns the HubSpot authorization URL as a JSON string.
async fn authorize(
    State(state): State<Arc<IntegrationAppState>>,
    axum::Form(form): axum::Form<UserOrgForm>,
) -> Result<Json<String>, IntegrationError> {
    debug!(org_id = %form.org_id, user_id = %form.user_id, "HubSpot authorize requested");
    let url = state.hubspot.authorize(&form.user_id, &form.org_id).await?;
    Ok(Json(url))
}

/// GET /integrations/hubspot/oauth2callback
///
/// Completes the handshake and answers with a page that closes the popup.
async fn oauth2callback(
    State(state): State<Arc<IntegrationAppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Html<String>, IntegrationError> {
    debug!("HubSpot OAuth callback received");
    let html = state.hubspot.callback(params).await?;
    Ok(Html(html))
}

/// POST /integrations/hubspot/credentials
///
/// Single-use: a second call for the same pair fails.
async fn credentials(
    State(state): State<Arc<IntegrationAppState>>,
    axum::Form(form): axum::Form<UserOrgForm>,
) -> Result<Json<Value>, IntegrationError> {
    let credentials = state
        .hubspot
        .get_credentials(&form.user_id, &form.org_id)
        .await?;
    Ok(Json(credentials))
}

/// POST /integrations/hubspot/load
async fn load_items(
    State(state): State<Arc<IntegrationAppState>>,
    axum::Form(form): axum::Form<LoadItemsForm>,
) -> Result<Json<Vec<IntegrationItem>>, IntegrationError> {
    let items = state.hubspot.get_items(&form.credentials).await?;
    Ok(Json(items))
}
