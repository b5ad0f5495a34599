//! OAuth token models: the wire payload and the stored record.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// Token endpoint response, for both the `authorization_code` and
/// `refresh_token` grants.
///
/// Spotify omits `refresh_token` on refresh grants; the field stays
/// optional so both payloads parse with one type.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Access token for Web API requests
    pub access_token: String,
    /// Token scheme, used verbatim in the Authorization header
    pub token_type: String,
    /// Granted scopes (space separated)
    #[serde(default)]
    pub scope: Option<String>,
    /// Lifetime in seconds from receipt
    pub expires_in: i64,
    /// Refresh token, when the grant issues one
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// The token record held by the service.
#[derive(Debug, Clone)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: String,
    /// Instant at which the access token stops being usable
    pub expires_at: DateTime<Utc>,
}

impl StoredToken {
    /// Build the stored record from a token response received at `now`.
    pub fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            token_type: response.token_type,
            expires_at: now + Duration::seconds(response.expires_in),
        }
    }

    /// Whether the token is past its expiry at instant `now`. The
    /// boundary itself counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// `Authorization` value for resource requests, e.g. `Bearer xyz`.
    /// The scheme comes from the token response, never a hardcoded one.
    pub fn authorization_value(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}
