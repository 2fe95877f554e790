// Configuration (TOML file + environment)
pub mod config;

// Integration error taxonomy
pub mod error;

// Expiring key-value store for handshake state and credentials
pub mod store;

// HubSpot OAuth handshake, contact loading and item normalization
pub mod integrations;

// HTTP API
pub mod api;

pub use error::IntegrationError;
pub use integrations::{HubSpotIntegration, IntegrationItem};
