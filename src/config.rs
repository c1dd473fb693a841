//! Client configuration and credentials.
//!
//! Both can be built by hand or read from the environment:
//!
//! - `ASTRO_LOYALTY_BASE_URL`: API root (defaults to [`DEFAULT_BASE_URL`])
//! - `ASTRO_LOYALTY_TIMEOUT_SECS`: per-request timeout in seconds
//! - `ASTRO_LOYALTY_USERNAME`, `ASTRO_LOYALTY_PASSWORD`, `ASTRO_LOYALTY_CLIENT_ID`:
//!   the credentials exchanged for a bearer token

use std::{env, fmt, time::Duration};
use url::Url;

use crate::error::{AstroError, Result};

/// The root every API path is appended to.
pub const DEFAULT_BASE_URL: &str = "https://api.astroloyalty.com/api/json";

/// Requests that take longer than this are abandoned by the transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// How to reach the API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// The API root. Checked by [`ClientConfig::with_base_url`]; endpoint
    /// URLs built from it are parsed again in [`ClientConfig::endpoint`].
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration pointing at a different API root,
    /// e.g. a staging host or a local mock server.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| AstroError::Config(format!("invalid base URL {base_url:?}: {err}")))?;

        Ok(Self {
            base_url: base_url.into(),
            ..Self::default()
        })
    }

    /// Reads overrides from the environment, keeping defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var("ASTRO_LOYALTY_BASE_URL") {
            Ok(base_url) => Self::with_base_url(&base_url)?,
            Err(_) => Self::default(),
        };

        if let Ok(timeout) = env::var("ASTRO_LOYALTY_TIMEOUT_SECS") {
            let seconds = timeout.parse::<u64>().map_err(|err| {
                AstroError::Config(format!("invalid ASTRO_LOYALTY_TIMEOUT_SECS: {err}"))
            })?;
            config.timeout = Duration::from_secs(seconds);
        }

        Ok(config)
    }

    /// Joins an endpoint path such as `/customerStatus/` onto the base URL.
    ///
    /// `Url::join` would discard the base's own path (`/api/json`), so the
    /// path is appended verbatim instead.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let joined = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        Url::parse(&joined)
            .map_err(|err| AstroError::Config(format!("invalid endpoint {joined:?}: {err}")))
    }
}

/// The account credentials exchanged for a bearer token.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub client_id: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            client_id: client_id.into(),
        }
    }

    /// Reads all three credentials from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            username: required_var("ASTRO_LOYALTY_USERNAME")?,
            password: required_var("ASTRO_LOYALTY_PASSWORD")?,
            client_id: required_var("ASTRO_LOYALTY_CLIENT_ID")?,
        })
    }
}

// The password must never end up in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("client_id", &self.client_id)
            .finish()
    }
}

fn required_var(name: &str) -> Result<String> {
    env::var(name).map_err(|_| AstroError::Config(format!("{name} is not set")))
}
