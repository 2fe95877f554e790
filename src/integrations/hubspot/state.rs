//! OAuth state handling for CSRF protection.
//!
//! A pending authorization is stored under `hubspot_state:{org}:{user}` and
//! also travels through HubSpot as the `state` query parameter, encoded as
//! URL-safe base64 JSON. The callback only proceeds when the token carried in
//! the parameter equals the stored one.

use base64::{
    alphabet,
    engine::{
        general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE, URL_SAFE_NO_PAD},
        DecodePaddingMode,
    },
    Engine,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Bytes of entropy in a state token
const STATE_TOKEN_BYTES: usize = 32;

/// URL-safe decoder that accepts the parameter with or without `=` padding
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// One in-flight handshake for an (org, user) pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAuthorization {
    pub state: String,
    pub user_id: String,
    pub org_id: String,
}

impl PendingAuthorization {
    /// Start a handshake with a fresh random state token
    pub fn new(user_id: &str, org_id: &str) -> Self {
        Self {
            state: generate_state_token(),
            user_id: user_id.to_string(),
            org_id: org_id.to_string(),
        }
    }

    /// Encode as the `state` query parameter
    pub fn encode(&self) -> serde_json::Result<String> {
        let json = serde_json::to_vec(self)?;
        Ok(URL_SAFE.encode(json))
    }

    /// Decode a `state` query parameter. Returns `None` for anything that is
    /// not base64 of the expected JSON object.
    pub fn decode(encoded: &str) -> Option<Self> {
        let bytes = URL_SAFE_LENIENT.decode(encoded.trim()).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Whether `other` carries the same state token, compared in constant time
    pub fn matches(&self, other: &PendingAuthorization) -> bool {
        constant_time_eq(self.state.as_bytes(), other.state.as_bytes())
    }

    pub fn state_key(&self) -> String {
        state_key(&self.org_id, &self.user_id)
    }

    pub fn credentials_key(&self) -> String {
        credentials_key(&self.org_id, &self.user_id)
    }
}

/// Store key for a pending authorization
pub fn state_key(org_id: &str, user_id: &str) -> String {
    format!("hubspot_state:{}:{}", org_id, user_id)
}

/// Store key for exchanged credentials
pub fn credentials_key(org_id: &str, user_id: &str) -> String {
    format!("hubspot_credentials:{}:{}", org_id, user_id)
}

/// Random URL-safe token
fn generate_state_token() -> String {
    let mut bytes = [0u8; STATE_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }

    result == 0
}
