use thiserror::Error;

/// Result type used across the client.
pub type Result<T> = std::result::Result<T, AstroError>;

/// Possible errors while working with the Astro Loyalty API.
#[derive(Debug, Error)]
pub enum AstroError {
    /// The token exchange did not succeed, so no client could be built.
    #[error("Token fetch failed: {0}")]
    Authentication(String),

    /// An endpoint call failed, either at the HTTP level or because the
    /// envelope reported a non-success `astro_status`.
    #[error("API error: {message}")]
    Api {
        /// The application status code, if the envelope carried one.
        status: Option<i64>,
        message: String,
    },

    /// A precondition was violated before anything was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The client could not be configured.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A request payload could not be encoded.
    #[error("Unable to encode request: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AstroError {
    /// Shorthand for a transport-level API failure with no status code.
    pub(crate) fn api(message: impl Into<String>) -> Self {
        Self::Api {
            status: None,
            message: message.into(),
        }
    }
}
