//! Payment Records
//!
//! Transient donation data and the local payment record identifiers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier assigned by the payment store
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentId(Uuid);

impl PaymentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Recorded locally, remote invoice not yet confirmed
    Pending,
    /// Invoice created, donor redirected to the hosted payment page
    Publish,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Publish => "publish",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Donor name fields as collected by the checkout form
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub first_name: String,
    pub last_name: String,
}

impl UserInfo {
    /// Full name, space-joined
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Incoming donation form payload
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DonationSubmission {
    /// Donation amount in major currency units
    pub price: Decimal,

    /// Title of the donation form the submission came from
    pub form_title: String,

    /// Recurrence-period mode selected on the form
    #[serde(default)]
    pub period_mode: String,

    /// Donation form id
    pub form_id: i64,

    /// Price-tier id, when the form has fixed tiers
    #[serde(default)]
    pub price_id: Option<String>,

    /// Donor email
    pub user_email: String,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    /// Purchase key; generated server-side when absent
    #[serde(default)]
    pub purchase_key: Option<String>,

    /// Gateway id, echoed back on checkout redirects
    #[serde(default = "default_gateway")]
    pub gateway: String,

    /// Anti-forgery token issued with the checkout form
    pub nonce: String,
}

fn default_gateway() -> String {
    "iugu".into()
}

/// Transient payment record, built once per donation attempt
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentData {
    pub price: Decimal,
    pub form_title: String,
    pub period_mode: String,
    pub form_id: i64,
    pub price_id: String,
    pub date: DateTime<Utc>,
    pub user_email: String,
    pub purchase_key: String,
    pub currency: String,
    pub user_info: UserInfo,
    pub status: PaymentStatus,
}

impl PaymentData {
    /// Build the pending record persisted ahead of any remote call
    pub fn pending(submission: &DonationSubmission, currency: String, date: DateTime<Utc>) -> Self {
        Self {
            price: submission.price,
            form_title: submission.form_title.clone(),
            period_mode: submission.period_mode.clone(),
            form_id: submission.form_id,
            price_id: submission.price_id.clone().unwrap_or_default(),
            date,
            user_email: submission.user_email.clone(),
            purchase_key: submission
                .purchase_key
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            currency,
            user_info: UserInfo {
                first_name: submission.first_name.clone(),
                last_name: submission.last_name.clone(),
            },
            status: PaymentStatus::Pending,
        }
    }

    /// Serialized form used for gateway-error records
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
