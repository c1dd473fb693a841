//! Request payloads.
//!
//! Each endpoint takes a small JSON object. Rust field names are snake_case,
//! while the API wants `customerID` and `transactionID`, so those are renamed
//! on the way out. Every other field name is sent unchanged.

use serde::{Deserialize, Serialize};

use crate::error::{AstroError, Result};

/// Optional details accepted when adding a customer.
/// Unset fields are left out of the request entirely.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// One entry of a transaction batch.
///
/// `transaction_id` and `item_code` are required by the API. They are
/// optional here so that batches assembled from loose data (e.g. parsed
/// JSON) can be checked before anything is sent.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchTransaction {
    pub transaction_id: Option<String>,
    pub item_code: Option<String>,
    pub item_qty: Option<u32>,
    pub item_transaction_date: Option<String>,
}

impl BatchTransaction {
    pub fn new(transaction_id: impl Into<String>, item_code: impl Into<String>) -> Self {
        Self {
            transaction_id: Some(transaction_id.into()),
            item_code: Some(item_code.into()),
            ..Self::default()
        }
    }

    pub fn with_quantity(mut self, item_qty: u32) -> Self {
        self.item_qty = Some(item_qty);
        self
    }

    /// The date is passed through as given; the API expects `YYYY-MM-DD`.
    pub fn with_date(mut self, item_transaction_date: impl Into<String>) -> Self {
        self.item_transaction_date = Some(item_transaction_date.into());
        self
    }
}

#[derive(Serialize, Debug)]
pub(crate) struct NoParams {}

#[derive(Serialize, Debug)]
pub(crate) struct CustomerRef<'a> {
    #[serde(rename = "customerID")]
    pub customer_id: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct SearchCustomer<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<&'a str>,
}

impl<'a> SearchCustomer<'a> {
    pub fn new(email_address: Option<&'a str>, phone: Option<&'a str>) -> Result<Self> {
        if email_address.is_none() && phone.is_none() {
            return Err(AstroError::InvalidArgument(
                "Either email_address or phone must be provided".into(),
            ));
        }
        Ok(Self {
            email_address,
            phone,
        })
    }
}

#[derive(Serialize, Debug)]
pub(crate) struct LinkCustomer<'a> {
    #[serde(rename = "customerID")]
    pub customer_id: &'a str,
    pub astro_customer_id: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct AddCustomer<'a> {
    #[serde(rename = "customerID")]
    pub customer_id: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    #[serde(flatten)]
    pub attributes: &'a CustomerAttributes,
}

#[derive(Serialize, Debug)]
pub(crate) struct OfferTransaction<'a> {
    #[serde(rename = "customerID")]
    pub customer_id: &'a str,
    #[serde(rename = "transactionID")]
    pub transaction_id: &'a str,
    pub item_code: &'a str,
    pub item_qty: u32,
}

#[derive(Serialize, Debug)]
pub(crate) struct TransactionRef<'a> {
    #[serde(rename = "customerID")]
    pub customer_id: &'a str,
    #[serde(rename = "transactionID")]
    pub transaction_id: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct TransactionBatch<'a> {
    #[serde(rename = "customerID")]
    pub customer_id: &'a str,
    pub transactions: Vec<BatchEntry<'a>>,
}

#[derive(Serialize, Debug)]
pub(crate) struct BatchEntry<'a> {
    #[serde(rename = "transactionID")]
    pub transaction_id: &'a str,
    pub item_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_qty: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_transaction_date: Option<&'a str>,
}

impl<'a> TransactionBatch<'a> {
    /// Checks every entry, failing on the first one missing a required field.
    pub fn new(customer_id: &'a str, transactions: &'a [BatchTransaction]) -> Result<Self> {
        let transactions = transactions
            .iter()
            .enumerate()
            .map(|(index, transaction)| BatchEntry::from_transaction(index, transaction))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            customer_id,
            transactions,
        })
    }
}

impl<'a> BatchEntry<'a> {
    fn from_transaction(index: usize, transaction: &'a BatchTransaction) -> Result<Self> {
        match (
            transaction.transaction_id.as_deref(),
            transaction.item_code.as_deref(),
        ) {
            (Some(transaction_id), Some(item_code)) => Ok(Self {
                transaction_id,
                item_code,
                item_qty: transaction.item_qty,
                item_transaction_date: transaction.item_transaction_date.as_deref(),
            }),
            (transaction_id, item_code) => {
                let mut missing = Vec::new();
                if transaction_id.is_none() {
                    missing.push("transaction_id");
                }
                if item_code.is_none() {
                    missing.push("item_code");
                }
                Err(AstroError::InvalidArgument(format!(
                    "Transaction at index {index} is missing required keys: {}",
                    missing.join(", ")
                )))
            }
        }
    }
}

#[derive(Serialize, Debug)]
pub(crate) struct AddRedemption<'a> {
    #[serde(rename = "customerID")]
    pub customer_id: &'a str,
    pub astro_reward_id: &'a str,
    pub astro_item_id: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct RemoveRedemption<'a> {
    #[serde(rename = "customerID")]
    pub customer_id: &'a str,
    pub astro_reward_id: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct RedemptionEligibility<'a> {
    #[serde(rename = "customerID")]
    pub customer_id: &'a str,
    pub item_code: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn customer_id_is_renamed() {
        let value = to_value(CustomerRef { customer_id: "123" }).unwrap();
        assert_eq!(value, json!({"customerID": "123"}));
    }

    #[test]
    fn no_params_is_an_empty_object() {
        assert_eq!(serde_json::to_string(&NoParams {}).unwrap(), "{}");
    }

    #[test]
    fn search_requires_a_criterion() {
        let error = SearchCustomer::new(None, None).unwrap_err();
        assert!(matches!(error, AstroError::InvalidArgument(_)));
    }

    #[test]
    fn search_omits_absent_criterion() {
        let search = SearchCustomer::new(None, Some("5551234567")).unwrap();
        assert_eq!(to_value(search).unwrap(), json!({"phone": "5551234567"}));
    }

    #[test]
    fn add_customer_flattens_only_set_attributes() {
        let attributes = CustomerAttributes {
            email_address: Some("john@example.com".into()),
            zip: Some("90210".into()),
            ..CustomerAttributes::default()
        };
        let request = AddCustomer {
            customer_id: "123",
            first_name: "John",
            last_name: "Doe",
            attributes: &attributes,
        };

        assert_eq!(
            to_value(request).unwrap(),
            json!({
                "customerID": "123",
                "first_name": "John",
                "last_name": "Doe",
                "email_address": "john@example.com",
                "zip": "90210"
            })
        );
    }

    #[test]
    fn batch_entries_use_wire_names() {
        let transactions = [
            BatchTransaction::new("t-1", "SKU1").with_quantity(2),
            BatchTransaction::new("t-2", "SKU2").with_date("2024-05-01"),
        ];
        let batch = TransactionBatch::new("123", &transactions).unwrap();

        assert_eq!(
            to_value(batch).unwrap(),
            json!({
                "customerID": "123",
                "transactions": [
                    {"transactionID": "t-1", "item_code": "SKU1", "item_qty": 2},
                    {"transactionID": "t-2", "item_code": "SKU2", "item_transaction_date": "2024-05-01"}
                ]
            })
        );
    }

    #[test]
    fn batch_reports_index_and_missing_keys() {
        let transactions = [
            BatchTransaction::new("t-1", "SKU1"),
            BatchTransaction::default(),
        ];
        let error = TransactionBatch::new("123", &transactions).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid argument: Transaction at index 1 is missing required keys: transaction_id, item_code"
        );
    }

    #[test]
    fn batch_transactions_deserialize_from_loose_json() {
        let transactions: Vec<BatchTransaction> =
            serde_json::from_value(json!([{"transaction_id": "t-1"}])).unwrap();
        let error = TransactionBatch::new("123", &transactions).unwrap_err();
        assert!(error.to_string().contains("index 0"));
        assert!(error.to_string().ends_with("item_code"));
    }
}
