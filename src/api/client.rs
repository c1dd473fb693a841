use serde::Serialize;
use serde_json::Value;
use std::{fmt, sync::Arc};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::{
    envelope::unwrap_envelope,
    requests::{
        AddCustomer, AddRedemption, BatchTransaction, CustomerAttributes, CustomerRef,
        LinkCustomer, NoParams, OfferTransaction, RedemptionEligibility, RemoveRedemption,
        SearchCustomer, TransactionBatch, TransactionRef,
    },
};
use crate::{
    auth::{Authenticator, Session},
    config::{ClientConfig, Credentials},
    error::{AstroError, Result},
    transport::{HttpTransport, Transport},
};

/// The form field every endpoint expects its JSON parameters under.
const JSON_DATA_FIELD: &str = "jsonData";

/// Quantity sent with an offer transaction when none is given.
pub const DEFAULT_ITEM_QTY: u32 = 1;

/// An authenticated client for the Astro Loyalty API.
///
/// Constructing one performs the token exchange; every call afterwards reuses
/// that token. The token is never refreshed, so long-lived processes should
/// watch [`Session::is_expired_at`] and build a fresh client when needed.
pub struct AstroClient {
    authenticator: Authenticator,
    transport: Arc<dyn Transport>,
    session: Session,
}

impl AstroClient {
    /// Authenticates against the production API.
    pub async fn connect(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default()).await
    }

    /// Authenticates against the API described by `config`.
    pub async fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Self::with_transport(credentials, Arc::new(transport)).await
    }

    /// Authenticates over a caller-provided transport.
    pub async fn with_transport(
        credentials: Credentials,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let authenticator = Authenticator::new(credentials);
        let session = authenticator.fetch_token(transport.as_ref()).await?;

        Ok(Self {
            authenticator,
            transport,
            session,
        })
    }

    /// The bearer token sent with every request.
    pub fn token(&self) -> &str {
        self.session.access_token()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn credentials(&self) -> &Credentials {
        self.authenticator.credentials()
    }

    pub async fn customer_status(&self, customer_id: &str) -> Result<Value> {
        self.post("/customerStatus/", &CustomerRef { customer_id })
            .await
    }

    pub async fn customer_reward_status(&self, customer_id: &str) -> Result<Value> {
        self.post("/customerRewardStatus/", &CustomerRef { customer_id })
            .await
    }

    /// Looks a customer up by email address, phone number, or both.
    /// At least one must be given.
    pub async fn search_customer(
        &self,
        email_address: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Value> {
        let search = SearchCustomer::new(email_address, phone)?;
        self.post("/searchCustomer/", &search).await
    }

    /// Associates our customer ID with an existing Astro customer.
    pub async fn link_customer(&self, customer_id: &str, astro_customer_id: &str) -> Result<Value> {
        self.post(
            "/linkCustomer/",
            &LinkCustomer {
                customer_id,
                astro_customer_id,
            },
        )
        .await
    }

    pub async fn add_customer(
        &self,
        customer_id: &str,
        first_name: &str,
        last_name: &str,
        attributes: &CustomerAttributes,
    ) -> Result<Value> {
        self.post(
            "/addCustomer/",
            &AddCustomer {
                customer_id,
                first_name,
                last_name,
                attributes,
            },
        )
        .await
    }

    pub async fn list_offers(&self) -> Result<Value> {
        self.post("/listOffers/", &NoParams {}).await
    }

    /// Records a purchase against an offer. `item_qty` defaults to [`DEFAULT_ITEM_QTY`].
    pub async fn add_offer_transaction(
        &self,
        customer_id: &str,
        transaction_id: &str,
        item_code: &str,
        item_qty: Option<u32>,
    ) -> Result<Value> {
        self.post(
            "/addOfferTransaction/",
            &OfferTransaction {
                customer_id,
                transaction_id,
                item_code,
                item_qty: item_qty.unwrap_or(DEFAULT_ITEM_QTY),
            },
        )
        .await
    }

    /// Records several purchases at once.
    ///
    /// Every entry must carry a transaction ID and an item code; if any does
    /// not, nothing is sent and the first offending index is reported.
    pub async fn add_transaction_batch(
        &self,
        customer_id: &str,
        transactions: &[BatchTransaction],
    ) -> Result<Value> {
        let batch = TransactionBatch::new(customer_id, transactions)?;
        self.post("/addTransactionBatch/", &batch).await
    }

    pub async fn remove_transaction(&self, customer_id: &str, transaction_id: &str) -> Result<Value> {
        self.post(
            "/removeTransaction/",
            &TransactionRef {
                customer_id,
                transaction_id,
            },
        )
        .await
    }

    pub async fn remove_offer_transaction(
        &self,
        customer_id: &str,
        transaction_id: &str,
    ) -> Result<Value> {
        self.post(
            "/removeOfferTransaction/",
            &TransactionRef {
                customer_id,
                transaction_id,
            },
        )
        .await
    }

    pub async fn add_redemption(
        &self,
        customer_id: &str,
        astro_reward_id: &str,
        astro_item_id: &str,
    ) -> Result<Value> {
        self.post(
            "/addRedemption/",
            &AddRedemption {
                customer_id,
                astro_reward_id,
                astro_item_id,
            },
        )
        .await
    }

    pub async fn remove_redemption(&self, customer_id: &str, astro_reward_id: &str) -> Result<Value> {
        self.post(
            "/removeRedemption/",
            &RemoveRedemption {
                customer_id,
                astro_reward_id,
            },
        )
        .await
    }

    pub async fn check_redemption_eligibility(
        &self,
        customer_id: &str,
        item_code: &str,
    ) -> Result<Value> {
        self.post(
            "/checkRedemptionEligibility/",
            &RedemptionEligibility {
                customer_id,
                item_code,
            },
        )
        .await
    }

    /// Sends `params` to `path` and unwraps the response envelope.
    ///
    /// The parameters travel as a JSON string inside the `jsonData` form field.
    #[instrument(skip(self, params), fields(request_id = %Uuid::new_v4()))]
    async fn post<T: Serialize + ?Sized>(&self, path: &str, params: &T) -> Result<Value> {
        let json_data = serde_json::to_string(params)?;
        debug!("dispatching request");

        let response = self
            .transport
            .post_form(path, Some(self.token()), &[(JSON_DATA_FIELD, json_data.as_str())])
            .await;
        if !response.success {
            warn!(message = %response.message, "request failed");
            return Err(AstroError::api(response.message));
        }

        unwrap_envelope(&response.body)
    }
}

impl fmt::Debug for AstroClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AstroClient")
            .field("authenticator", &self.authenticator)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
