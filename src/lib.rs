//! A client for the Astro Loyalty REST API.
//!
//! Building an [`AstroClient`] exchanges account credentials for a bearer
//! token once; every endpoint method then POSTs its parameters and returns
//! the `returnData` payload of the response envelope.
//!
//! ```no_run
//! use astroloyalty::{AstroClient, Credentials};
//!
//! # async fn example() -> astroloyalty::Result<()> {
//! let credentials = Credentials::new("username", "password", "client_id");
//! let client = AstroClient::connect(credentials).await?;
//!
//! let status = client.customer_status("123").await?;
//! println!("{status}");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod transport;

pub use api::{AstroClient, BatchTransaction, CustomerAttributes};
pub use auth::{Authenticator, Session};
pub use config::{ClientConfig, Credentials};
pub use error::{AstroError, Result};
pub use transport::{HttpTransport, Transport, TransportResponse};
