//! OAuth token exchange logic.
//!
//! Handles exchanging authorization codes for access tokens.

use crate::config::HubSpotConfig;
use crate::error::{IntegrationError, Result};
use serde::Serialize;
use serde_json::Value;

/// OAuth token exchange request (form-encoded)
#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

/// Exchange an authorization code for an access token
///
/// Returns the token endpoint's JSON response untouched; it is stored as-is
/// and handed back to the caller later.
pub async fn exchange_code_for_token(
    http_client: &reqwest::Client,
    config: &HubSpotConfig,
    code: &str,
) -> Result<Value> {
    let request = TokenRequest {
        grant_type: "authorization_code",
        code,
        redirect_uri: &config.redirect_uri,
        client_id: &config.client_id,
        client_secret: &config.client_secret,
    };

    tracing::debug!("Exchanging authorization code for token at {}", config.token_url);

    let response = http_client
        .post(&config.token_url)
        .form(&request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::warn!(status = %status, body = %body, "Token exchange rejected");
        return Err(IntegrationError::TokenExchangeFailed);
    }

    response.json::<Value>().await.map_err(|e| {
        tracing::warn!(error = %e, "Token response is not JSON");
        IntegrationError::TokenExchangeFailed
    })
}
