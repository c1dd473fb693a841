use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::{
    fmt,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

/// The body returned by `/token/`.
///
/// Observed responses look like:
/// ```json
/// {"access_token": "...", "token_type": "bearer", "expires": "1800", "created": "1700000000"}
/// ```
/// Only `access_token` is required; the numeric fields show up as strings
/// or numbers depending on the deployment.
#[derive(Deserialize, Debug)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub expires: Option<u64>,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub created: Option<u64>,
}

/// Accepts `1800`, `"1800"` or nothing at all.
fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_u64(),
        Some(Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    })
}

/// A bearer token and what the server told us about it.
///
/// The token itself is never refreshed. Callers that care about expiry can
/// check [`Session::is_expired_at`] and build a new client.
#[derive(Clone)]
pub struct Session {
    access_token: String,
    token_type: Option<String>,
    lifetime: Option<Duration>,
    issued_at: SystemTime,
}

impl Session {
    /// Wraps a token with no expiry information.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: None,
            lifetime: None,
            issued_at: SystemTime::now(),
        }
    }

    /// Builds a session from a token response received at `received_at`.
    /// The server's `created` timestamp wins over our own clock.
    pub(crate) fn from_response(response: TokenResponse, received_at: SystemTime) -> Self {
        let issued_at = response
            .created
            .map(|created| UNIX_EPOCH + Duration::from_secs(created))
            .unwrap_or(received_at);

        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            lifetime: response.expires.map(Duration::from_secs),
            issued_at,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn token_type(&self) -> Option<&str> {
        self.token_type.as_deref()
    }

    pub fn issued_at(&self) -> SystemTime {
        self.issued_at
    }

    /// When the token stops being valid, if the server said.
    pub fn expires_at(&self) -> Option<SystemTime> {
        self.lifetime.map(|lifetime| self.issued_at + lifetime)
    }

    /// Tokens without a known lifetime are never considered expired.
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        self.expires_at().is_some_and(|expiry| now >= expiry)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("lifetime", &self.lifetime)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}
