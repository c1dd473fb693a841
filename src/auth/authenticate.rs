use std::time::SystemTime;
use tracing::{info, warn};

use super::session::{Session, TokenResponse};
use crate::{
    config::Credentials,
    error::{AstroError, Result},
    transport::Transport,
};

/// The token endpoint, relative to the API root.
pub const TOKEN_PATH: &str = "/token/";

/// The OAuth2 grant we use: a plain username/password exchange.
const GRANT_TYPE: &str = "password";

/// Exchanges account credentials for a bearer token.
#[derive(Debug, Clone)]
pub struct Authenticator {
    credentials: Credentials,
}

impl Authenticator {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Performs the token exchange once. There is no retry.
    ///
    /// Unlike every other endpoint, `/token/` takes plain form fields
    /// rather than a `jsonData` envelope, and is sent without a bearer.
    pub async fn fetch_token(&self, transport: &dyn Transport) -> Result<Session> {
        let form = [
            ("username", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
            ("grant_type", GRANT_TYPE),
            ("client_id", self.credentials.client_id.as_str()),
        ];

        let response = transport.post_form(TOKEN_PATH, None, &form).await;
        if !response.success {
            warn!(message = %response.message, "token exchange failed");
            return Err(AstroError::Authentication(response.message));
        }

        let token: TokenResponse = serde_json::from_str(&response.body).map_err(|err| {
            AstroError::Authentication(format!("unexpected token response: {err}"))
        })?;

        let session = Session::from_response(token, SystemTime::now());
        info!(expires_at = ?session.expires_at(), "obtained access token");
        Ok(session)
    }
}
