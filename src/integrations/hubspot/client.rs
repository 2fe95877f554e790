use crate::error::{IntegrationError, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// Contact listing path relative to the API base URL
pub const CONTACTS_PATH: &str = "/crm/v3/objects/contacts";

/// One page of CRM objects. Paging links are ignored.
#[derive(Debug, Deserialize)]
pub struct ObjectPage {
    #[serde(default)]
    pub results: Vec<Value>,
}

/// HTTP client for the HubSpot CRM API.
///
/// Authenticates every request with a Bearer token.
pub struct HubSpotClient<'a> {
    access_token: &'a str,
    http_client: &'a Client,
    base_url: &'a str,
}

impl<'a> HubSpotClient<'a> {
    pub fn new(http_client: &'a Client, base_url: &'a str, access_token: &'a str) -> Self {
        Self {
            access_token,
            http_client,
            base_url,
        }
    }

    /// Fetch the first page of contacts as raw records.
    pub async fn fetch_contacts(&self) -> Result<Vec<Value>> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), CONTACTS_PATH);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(self.access_token)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "HubSpot contact listing failed");
            return Err(IntegrationError::UpstreamFetchFailed);
        }

        let page = response.json::<ObjectPage>().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse contacts response");
            IntegrationError::UpstreamFetchFailed
        })?;

        Ok(page.results)
    }
}
