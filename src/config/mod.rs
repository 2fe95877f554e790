use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Complete service configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub hubspot: HubSpotConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Frontend origins allowed by CORS
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cors_origins: default_cors_origins(),
        }
    }
}

/// HubSpot OAuth application and endpoint configuration.
///
/// Client credentials normally come from `HUBSPOT_CLIENT_ID` and
/// `HUBSPOT_CLIENT_SECRET`; the redirect URI must match the one registered
/// with the HubSpot app exactly.
#[derive(Debug, Clone, Deserialize)]
pub struct HubSpotConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

fn default_redirect_uri() -> String {
    "http://localhost:8000/integrations/hubspot/oauth2callback".to_string()
}

fn default_auth_url() -> String {
    "https://app.hubspot.com/oauth/authorize".to_string()
}

fn default_token_url() -> String {
    "https://api.hubspot.com/oauth/v1/token".to_string()
}

fn default_api_base_url() -> String {
    "https://api.hubapi.com".to_string()
}

fn default_scopes() -> Vec<String> {
    vec![
        "crm.objects.contacts.read".to_string(),
        "crm.objects.companies.read".to_string(),
    ]
}

impl Default for HubSpotConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: default_redirect_uri(),
            auth_url: default_auth_url(),
            token_url: default_token_url(),
            api_base_url: default_api_base_url(),
            scopes: default_scopes(),
        }
    }
}

/// Expiration settings for transient store entries
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_ttl")]
    pub state_ttl_seconds: u64,
    #[serde(default = "default_ttl")]
    pub credential_ttl_seconds: u64,
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
}

/// Longest accepted store TTL (one year)
pub const MAX_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

fn default_ttl() -> u64 {
    600
}

fn default_cleanup_interval() -> u64 {
    60
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            state_ttl_seconds: default_ttl(),
            credential_ttl_seconds: default_ttl(),
            cleanup_interval_seconds: default_cleanup_interval(),
        }
    }
}

impl AppConfig {
    /// Apply environment variable overrides on top of file/default values.
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("HUBSPOT_CLIENT_ID") {
            self.hubspot.client_id = v;
        }
        if let Ok(v) = std::env::var("HUBSPOT_CLIENT_SECRET") {
            self.hubspot.client_secret = v;
        }
        if let Ok(v) = std::env::var("HUBSPOT_REDIRECT_URI") {
            self.hubspot.redirect_uri = v;
        }
        if let Ok(v) = std::env::var("HUBSPOT_LINK_BIND_ADDR") {
            self.server.bind_addr = v;
        }
    }

    /// Reject configurations the OAuth flow cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.hubspot.client_id.is_empty() {
            bail!("HubSpot client ID not configured (set HUBSPOT_CLIENT_ID)");
        }
        if self.hubspot.client_secret.is_empty() {
            bail!("HubSpot client secret not configured (set HUBSPOT_CLIENT_SECRET)");
        }
        if self.store.state_ttl_seconds == 0 || self.store.credential_ttl_seconds == 0 {
            bail!("Store TTLs must be greater than zero");
        }
        if self.store.state_ttl_seconds > MAX_TTL_SECONDS
            || self.store.credential_ttl_seconds > MAX_TTL_SECONDS
        {
            bail!("Store TTLs must not exceed {} seconds", MAX_TTL_SECONDS);
        }
        if self.store.cleanup_interval_seconds == 0 {
            bail!("Store cleanup interval must be greater than zero");
        }
        Ok(())
    }
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Load configuration from `path` if it exists (defaults otherwise), then
/// apply environment overrides and validate.
pub fn load_from_env_and_file<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    let mut config = if path.exists() {
        load_config(path)?
    } else {
        AppConfig::default()
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
}
