//! The HTTP collaborator underneath the client.
//!
//! Everything the API needs from HTTP is a form-encoded POST that reports
//! whether it succeeded, a status message, and the response body. Keeping
//! that behind [`Transport`] lets tests and alternative HTTP stacks slot in.

use async_trait::async_trait;
use reqwest::{header, Method};
use tracing::debug;

use crate::{
    config::ClientConfig,
    error::{AstroError, Result},
};

/// The outcome of a single POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// Whether the request completed with a 2xx status.
    pub success: bool,
    /// The HTTP reason phrase, or the error text if the request never completed.
    pub message: String,
    /// The raw response body. Empty when the request never completed.
    pub body: String,
}

impl TransportResponse {
    /// A request that never produced an HTTP response.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            body: String::new(),
        }
    }
}

/// Performs form-encoded POSTs against the API root.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs `form` to `path`, attaching `bearer` as an Authorization header when given.
    ///
    /// Failures are reported through [`TransportResponse::success`] rather than
    /// an error, so callers decide which error kind a failure becomes.
    async fn post_form(
        &self,
        path: &str,
        bearer: Option<&str>,
        form: &[(&str, &str)],
    ) -> TransportResponse;
}

/// The default [`Transport`], backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|err| AstroError::Config(format!("unable to build HTTP client: {err}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(
        &self,
        path: &str,
        bearer: Option<&str>,
        form: &[(&str, &str)],
    ) -> TransportResponse {
        let url = match self.config.endpoint(path) {
            Ok(url) => url,
            Err(err) => return TransportResponse::failed(err.to_string()),
        };

        // `form` sets the urlencoded content type for us.
        let mut request = self.client.request(Method::POST, url).form(form);
        if let Some(token) = bearer {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                debug!(path, error = %err, "request did not complete");
                return TransportResponse::failed(err.to_string());
            }
        };

        let status = response.status();
        debug!(path, status = status.as_u16(), "received response");

        // Mirror what most HTTP libraries call the response "message".
        let message = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string());

        match response.text().await {
            Ok(body) => TransportResponse {
                success: status.is_success(),
                message,
                body,
            },
            Err(err) => TransportResponse::failed(format!("unable to read response body: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_response_has_empty_body() {
        let response = TransportResponse::failed("connection refused");
        assert!(!response.success);
        assert_eq!(response.message, "connection refused");
        assert!(response.body.is_empty());
    }

    #[test]
    fn builds_with_default_config() {
        let transport = HttpTransport::new(ClientConfig::default()).unwrap();
        assert_eq!(
            transport.config().base_url.as_str(),
            crate::config::DEFAULT_BASE_URL
        );
    }
}
