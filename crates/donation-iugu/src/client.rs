//! Iugu API Client
//!
//! Hand-built REST client for the Iugu invoicing API; there is no
//! official Rust SDK. Authentication is HTTP basic with the API token
//! as the username and an empty password.
//!
//! The invoice-create response is resolved here, once, into a tagged
//! [`InvoiceOutcome`]: the `errors` field the API returns on refusal
//! may be a field-to-messages mapping or a flat string, and callers
//! never inspect that shape themselves.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{IuguError, Result};
use crate::payer::Payer;

/// Production API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.iugu.com/v1";

/// Request to create a remote customer
#[derive(Clone, Debug, Serialize)]
pub struct CustomerRequest {
    pub email: String,
    pub name: String,
}

/// Remote customer as returned by the API
#[derive(Clone, Debug, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// One invoice line item
#[derive(Clone, Debug, Serialize)]
pub struct InvoiceItem {
    pub description: String,
    pub price_cents: i64,
    pub quantity: u32,
}

/// Request to create a remote invoice
#[derive(Clone, Debug, Serialize)]
pub struct InvoiceRequest {
    pub customer_id: String,
    /// Merchant account email, not the donor's
    pub email: String,
    /// ISO date (YYYY-MM-DD)
    pub due_date: String,
    pub payer: Payer,
    pub payable_with: String,
    pub ensure_workday_due_date: bool,
    pub items: Vec<InvoiceItem>,
}

/// Remote invoice as returned by the API
#[derive(Clone, Debug, Deserialize)]
pub struct Invoice {
    pub id: String,
    /// Hosted payment page the donor is redirected to
    pub secure_url: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub total_cents: Option<i64>,
}

/// Invoice creation resolved at the client boundary
#[derive(Clone, Debug)]
pub enum InvoiceOutcome {
    /// Invoice exists remotely, carries the hosted payment URL
    Created(Invoice),
    /// The API refused the invoice with an errors payload
    Rejected(InvoiceRejection),
}

/// Rejection payload shapes the API is known to return
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvoiceRejection {
    /// Field name to messages
    Fields(BTreeMap<String, Vec<String>>),
    /// Flat message
    Message(String),
}

impl InvoiceRejection {
    fn from_value(errors: &Value) -> Self {
        match errors {
            Value::Object(map) => Self::Fields(
                map.iter()
                    .map(|(name, messages)| (name.clone(), coerce_messages(messages)))
                    .collect(),
            ),
            Value::String(message) => Self::Message(message.clone()),
            other => Self::Message(other.to_string()),
        }
    }
}

fn coerce_messages(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(coerce_message).collect(),
        other => vec![coerce_message(other)],
    }
}

fn coerce_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Remote invoicing API surface
///
/// One implementation talks HTTP ([`IuguClient`]); tests and demos use
/// [`MockIuguApi`](crate::MockIuguApi).
#[async_trait]
pub trait IuguApi: Send + Sync {
    /// Create a customer record for the donor
    async fn create_customer(&self, request: CustomerRequest) -> Result<Customer>;

    /// Create an invoice; refusals come back as a resolved outcome
    async fn create_invoice(&self, request: InvoiceRequest) -> Result<InvoiceOutcome>;

    /// Fetch an invoice by id
    async fn fetch_invoice(&self, id: &str) -> Result<Invoice>;
}

/// HTTP client for the Iugu API
///
/// Holds its token explicitly; there is no process-global key state.
pub struct IuguClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl IuguClient {
    /// Client against the production endpoint
    pub fn new(api_token: impl Into<String>) -> Self {
        Self::with_base_url(api_token, DEFAULT_BASE_URL)
    }

    /// Client against a custom endpoint (sandbox, local stub)
    pub fn with_base_url(api_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_token: api_token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(reqwest::StatusCode, Value)> {
        let response = self
            .http
            .post(self.url(path))
            .basic_auth(&self.api_token, Some(""))
            .json(body)
            .send()
            .await
            .map_err(|e| IuguError::Transport(e.to_string()))?;

        let status = response.status();
        let value = response
            .json::<Value>()
            .await
            .map_err(|e| IuguError::Decode(e.to_string()))?;

        Ok((status, value))
    }
}

#[async_trait]
impl IuguApi for IuguClient {
    async fn create_customer(&self, request: CustomerRequest) -> Result<Customer> {
        let (status, value) = self.post_json("/customers", &request).await?;

        if !status.is_success() {
            return Err(IuguError::Status {
                status: status.as_u16(),
                body: value.to_string(),
            });
        }

        serde_json::from_value(value).map_err(|e| IuguError::Decode(e.to_string()))
    }

    async fn create_invoice(&self, request: InvoiceRequest) -> Result<InvoiceOutcome> {
        let (status, value) = self.post_json("/invoices", &request).await?;

        // A refusal carries an errors field, usually alongside a 4xx
        if let Some(errors) = value.get("errors").filter(|e| !e.is_null()) {
            return Ok(InvoiceOutcome::Rejected(InvoiceRejection::from_value(
                errors,
            )));
        }

        if !status.is_success() {
            return Err(IuguError::Status {
                status: status.as_u16(),
                body: value.to_string(),
            });
        }

        let invoice: Invoice =
            serde_json::from_value(value).map_err(|e| IuguError::Decode(e.to_string()))?;
        Ok(InvoiceOutcome::Created(invoice))
    }

    async fn fetch_invoice(&self, id: &str) -> Result<Invoice> {
        let response = self
            .http
            .get(self.url(&format!("/invoices/{id}")))
            .basic_auth(&self.api_token, Some(""))
            .send()
            .await
            .map_err(|e| IuguError::Transport(e.to_string()))?;

        let status = response.status();
        let value = response
            .json::<Value>()
            .await
            .map_err(|e| IuguError::Decode(e.to_string()))?;

        if !status.is_success() {
            return Err(IuguError::Status {
                status: status.as_u16(),
                body: value.to_string(),
            });
        }

        serde_json::from_value(value).map_err(|e| IuguError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejection_from_field_map() {
        let errors = json!({"email": ["invalid", "taken"], "due_date": "is past"});

        let rejection = InvoiceRejection::from_value(&errors);
        let InvoiceRejection::Fields(fields) = rejection else {
            panic!("expected field rejection");
        };

        assert_eq!(fields["email"], vec!["invalid", "taken"]);
        assert_eq!(fields["due_date"], vec!["is past"]);
    }

    #[test]
    fn test_rejection_from_flat_string() {
        let rejection = InvoiceRejection::from_value(&json!("invalid token"));
        assert_eq!(rejection, InvoiceRejection::Message("invalid token".into()));
    }

    #[test]
    fn test_rejection_from_unexpected_shape() {
        let rejection = InvoiceRejection::from_value(&json!(["a", "b"]));
        assert_eq!(rejection, InvoiceRejection::Message("[\"a\",\"b\"]".into()));
    }

    #[test]
    fn test_invoice_request_wire_shape() {
        let request = InvoiceRequest {
            customer_id: "cus_1".into(),
            email: "merchant@example.com".into(),
            due_date: "2026-08-12".into(),
            payer: crate::build_payer(&donation_core::MemorySettingsStore::new()),
            payable_with: "all".into(),
            ensure_workday_due_date: true,
            items: vec![InvoiceItem {
                description: "Doação Campanha".into(),
                price_cents: 2500,
                quantity: 1,
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["customer_id"], "cus_1");
        assert_eq!(json["payable_with"], "all");
        assert_eq!(json["ensure_workday_due_date"], true);
        assert_eq!(json["items"][0]["price_cents"], 2500);
        assert_eq!(json["payer"]["address"]["country"], "BRASIL");
    }

    #[test]
    fn test_invoice_decodes_without_optional_fields() {
        let invoice: Invoice = serde_json::from_value(json!({
            "id": "inv_1",
            "secure_url": "https://faturas.iugu.com/inv_1",
        }))
        .unwrap();

        assert_eq!(invoice.id, "inv_1");
        assert_eq!(invoice.status, None);
    }
}
