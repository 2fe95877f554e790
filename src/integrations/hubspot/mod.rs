//! HubSpot OAuth 2.0 integration.
//!
//! Implements the authorization code flow:
//! 1. Frontend asks for an authorization URL for (user, org)
//! 2. User authorizes on HubSpot's site
//! 3. HubSpot redirects to the callback with `code` and `state`
//! 4. State is validated, code exchanged, token response stored briefly
//! 5. Frontend collects the credentials once and loads contacts with them
//!
//! All handshake state lives in the [`KeyValueStore`]; the integration itself
//! keeps nothing between calls.

mod client;
mod exchange;
mod items;
mod state;

pub use client::{HubSpotClient, CONTACTS_PATH};
pub use items::{create_integration_item, UNKNOWN_TYPE, UNNAMED_ITEM};
pub use state::{credentials_key, state_key, PendingAuthorization};

use crate::config::{HubSpotConfig, StoreConfig};
use crate::error::{IntegrationError, Result};
use crate::integrations::item::IntegrationItem;
use crate::store::KeyValueStore;
use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Page returned to the browser after the callback; it only closes itself.
pub const CLOSE_WINDOW_HTML: &str = r#"<html>
    <script>
        window.close();
    </script>
</html>
"#;

/// OAuth callback query parameters
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// HubSpot handshake controller and contact loader
pub struct HubSpotIntegration {
    config: HubSpotConfig,
    store: Arc<dyn KeyValueStore>,
    http_client: reqwest::Client,
    state_ttl_seconds: u64,
    credential_ttl_seconds: u64,
}

impl HubSpotIntegration {
    pub fn new(
        config: HubSpotConfig,
        store_config: &StoreConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            config,
            store,
            http_client: reqwest::Client::new(),
            state_ttl_seconds: store_config.state_ttl_seconds,
            credential_ttl_seconds: store_config.credential_ttl_seconds,
        }
    }

    /// Start a handshake for (user, org) and return the HubSpot URL to send
    /// the user to.
    ///
    /// Any earlier pending handshake for the same pair is replaced.
    pub async fn authorize(&self, user_id: &str, org_id: &str) -> Result<String> {
        let pending = PendingAuthorization::new(user_id, org_id);
        let record = serde_json::to_string(&pending)
            .context("Failed to serialize pending authorization")
            .map_err(IntegrationError::Store)?;
        let encoded_state = pending
            .encode()
            .context("Failed to encode state parameter")
            .map_err(IntegrationError::Store)?;

        self.store
            .put(&pending.state_key(), &record, self.state_ttl_seconds)
            .await
            .map_err(IntegrationError::Store)?;

        info!(org_id = %org_id, user_id = %user_id, "HubSpot authorization started");

        Ok(self.build_auth_url(&encoded_state))
    }

    /// Build the HubSpot authorization URL carrying `encoded_state`
    pub fn build_auth_url(&self, encoded_state: &str) -> String {
        let scopes = self.config.scopes.join(" ");
        format!(
            "{}?client_id={}&scope={}&redirect_uri={}&state={}",
            self.config.auth_url,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&scopes),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(encoded_state)
        )
    }

    /// Handle HubSpot's redirect back to us.
    ///
    /// On success the token response is stored for the pair and an HTML page
    /// that closes the browser window is returned.
    ///
    /// # Security
    /// - The state token must equal the stored one (constant-time comparison)
    /// - A mismatching state leaves the pending record in place
    /// - A matching state is consumed atomically before the code exchange,
    ///   and stays consumed if the exchange fails
    pub async fn callback(&self, params: CallbackParams) -> Result<String> {
        if let Some(error) = params.error {
            let message = match params.error_description {
                Some(description) => format!("{}: {}", error, description),
                None => error,
            };
            return Err(IntegrationError::ProviderError(message));
        }

        let received = params
            .state
            .as_deref()
            .and_then(PendingAuthorization::decode)
            .ok_or(IntegrationError::InvalidState)?;
        let code = params.code.ok_or(IntegrationError::MissingCode)?;

        // Validate and consume in one step so a replayed callback cannot
        // redeem the same code twice
        let matches_received = |raw: &str| {
            serde_json::from_str::<PendingAuthorization>(raw)
                .map(|stored| stored.matches(&received))
                .unwrap_or(false)
        };
        let consumed = self
            .store
            .take_if(&received.state_key(), &matches_received)
            .await
            .map_err(IntegrationError::Store)?;

        if consumed.is_none() {
            warn!(
                org_id = %received.org_id,
                user_id = %received.user_id,
                "Missing or mismatched OAuth state"
            );
            return Err(IntegrationError::StateMismatch);
        }

        debug!(org_id = %received.org_id, user_id = %received.user_id, "OAuth state consumed");

        let token =
            exchange::exchange_code_for_token(&self.http_client, &self.config, &code).await?;

        let credentials = serde_json::to_string(&token)
            .context("Failed to serialize token response")
            .map_err(IntegrationError::Store)?;
        self.store
            .put(
                &received.credentials_key(),
                &credentials,
                self.credential_ttl_seconds,
            )
            .await
            .map_err(IntegrationError::Store)?;

        info!(
            org_id = %received.org_id,
            user_id = %received.user_id,
            "HubSpot OAuth flow completed"
        );

        Ok(CLOSE_WINDOW_HTML.to_string())
    }

    /// Hand out the stored token response for (user, org), exactly once.
    pub async fn get_credentials(&self, user_id: &str, org_id: &str) -> Result<Value> {
        let raw = self
            .store
            .take(&credentials_key(org_id, user_id))
            .await
            .map_err(IntegrationError::Store)?
            .ok_or(IntegrationError::NoCredentials)?;

        debug!(org_id = %org_id, user_id = %user_id, "HubSpot credentials consumed");

        serde_json::from_str(&raw)
            .context("Stored credentials are not valid JSON")
            .map_err(IntegrationError::Store)
    }

    /// Load the first page of contacts using a credential blob previously
    /// returned by [`Self::get_credentials`].
    pub async fn get_items(&self, credentials: &str) -> Result<Vec<IntegrationItem>> {
        let credentials: Value =
            serde_json::from_str(credentials).map_err(|_| IntegrationError::InvalidCredentials)?;
        let access_token = credentials
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or(IntegrationError::InvalidCredentials)?;

        let client = HubSpotClient::new(&self.http_client, &self.config.api_base_url, access_token);
        let records = client.fetch_contacts().await?;

        let items: Vec<IntegrationItem> = records.iter().map(create_integration_item).collect();

        info!(count = items.len(), "Loaded HubSpot items");

        Ok(items)
    }
}
