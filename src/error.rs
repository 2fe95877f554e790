//! Errors surfaced by the HubSpot integration.
//!
//! Every handshake and fetch failure maps to a client error with a short
//! message. Store and transport failures are the only server-side errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

/// Integration error taxonomy
#[derive(Debug)]
pub enum IntegrationError {
    /// HubSpot redirected back with an `error` query parameter
    ProviderError(String),
    /// `state` parameter missing, not base64, or not the expected JSON
    InvalidState,
    /// Callback carried no authorization code
    MissingCode,
    /// No pending authorization for the pair, or the state token differs
    StateMismatch,
    /// Token endpoint answered with a non-success status
    TokenExchangeFailed,
    /// Credentials expired, never issued, or already consumed
    NoCredentials,
    /// Credential blob is not JSON or has no access token
    InvalidCredentials,
    /// Contact listing answered with a non-success status
    UpstreamFetchFailed,
    /// Key-value store failure
    Store(anyhow::Error),
    /// Could not reach HubSpot at all
    Http(reqwest::Error),
}

pub type Result<T> = std::result::Result<T, IntegrationError>;

impl IntegrationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            IntegrationError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            IntegrationError::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl std::fmt::Display for IntegrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrationError::ProviderError(msg) => write!(f, "{}", msg),
            IntegrationError::InvalidState => write!(f, "Invalid state parameter."),
            IntegrationError::MissingCode => write!(f, "Missing authorization code."),
            IntegrationError::StateMismatch => write!(f, "State does not match."),
            IntegrationError::TokenExchangeFailed => write!(f, "Failed to obtain access token."),
            IntegrationError::NoCredentials => write!(f, "No credentials found."),
            IntegrationError::InvalidCredentials => write!(f, "Invalid credentials."),
            IntegrationError::UpstreamFetchFailed => {
                write!(f, "Failed to fetch data from HubSpot")
            }
            IntegrationError::Store(e) => write!(f, "Credential store error: {}", e),
            IntegrationError::Http(e) => write!(f, "HubSpot request failed: {}", e),
        }
    }
}

impl std::error::Error for IntegrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IntegrationError::Store(e) => Some(&**e),
            IntegrationError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for IntegrationError {
    fn from(e: reqwest::Error) -> Self {
        IntegrationError::Http(e)
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for IntegrationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %self, "Request rejected");
        }

        let body = Json(ErrorResponse {
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}
