//! Invoice Sending
//!
//! Resolves the test/live credential, prices the donation, and drives
//! the remote customer and invoice creation in order. No retries and no
//! idempotency key: calling twice creates two remote customers and two
//! invoices.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use donation_core::{PaymentData, SettingsStore, keys};

use crate::client::{
    CustomerRequest, InvoiceItem, InvoiceOutcome, InvoiceRequest, IuguApi, IuguClient,
};
use crate::error::{IuguError, Result};
use crate::payer::build_payer;

/// Minimum charge accepted by the API: one full currency unit
pub const MIN_PRICE_CENTS: i64 = 100;

/// Calendar days until the invoice falls due
pub const DUE_IN_DAYS: i64 = 6;

/// Line-item description prefix, shown on the hosted invoice (pt-BR)
pub const ITEM_DESCRIPTION_PREFIX: &str = "Doação ";

/// Which credential set addresses the API
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiMode {
    Test,
    Live,
}

impl ApiMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Live => "live",
        }
    }
}

/// Select the credential addressed by the test-mode flag
///
/// Live mode prefers the user token and falls back to the live token.
pub fn resolve_credential(settings: &dyn SettingsStore) -> Result<(ApiMode, String)> {
    let mode = if settings.is_on(keys::TEST_ENABLED) {
        ApiMode::Test
    } else {
        ApiMode::Live
    };

    let token = match mode {
        ApiMode::Test => settings.get(keys::TEST_TOKEN),
        ApiMode::Live => settings
            .get(keys::USER_TOKEN)
            .or_else(|| settings.get(keys::LIVE_TOKEN)),
    };

    token
        .filter(|token| !token.is_empty())
        .map(|token| (mode, token))
        .ok_or(IuguError::MissingToken(mode.as_str()))
}

/// Donation price in major units to invoice cents, clamped to the
/// gateway minimum
pub fn charge_cents(price: Decimal) -> i64 {
    let cents = (price * Decimal::from(100))
        .round()
        .to_i64()
        .unwrap_or(i64::MAX);
    cents.max(MIN_PRICE_CENTS)
}

/// Due date: the creation instant plus [`DUE_IN_DAYS`] calendar days,
/// as an ISO date
pub fn due_date(from: DateTime<Utc>) -> String {
    (from + Duration::days(DUE_IN_DAYS))
        .format("%Y-%m-%d")
        .to_string()
}

/// Drives remote invoice creation for one donation
pub struct InvoiceSender {
    api: Arc<dyn IuguApi>,
}

impl InvoiceSender {
    /// Sender over an already-configured API implementation
    pub fn new(api: Arc<dyn IuguApi>) -> Self {
        Self { api }
    }

    /// Resolve credentials from settings and build a sender over a
    /// production client
    pub fn from_settings(settings: &dyn SettingsStore) -> Result<Self> {
        let (mode, token) = resolve_credential(settings)?;
        tracing::debug!(mode = mode.as_str(), "iugu credential selected");

        Ok(Self::new(Arc::new(IuguClient::new(token))))
    }

    /// Create the remote customer, then the invoice
    ///
    /// When the verify-invoice flag is on, the created invoice is
    /// re-fetched by id and the fetched copy is returned instead.
    pub async fn send(
        &self,
        settings: &dyn SettingsStore,
        payment: &PaymentData,
    ) -> Result<InvoiceOutcome> {
        let customer = self
            .api
            .create_customer(CustomerRequest {
                email: payment.user_email.clone(),
                name: payment.user_info.full_name(),
            })
            .await?;

        let request = InvoiceRequest {
            customer_id: customer.id,
            email: settings.get_or_empty(keys::ACCOUNT_EMAIL),
            due_date: due_date(Utc::now()),
            payer: build_payer(settings),
            payable_with: "all".into(),
            ensure_workday_due_date: true,
            items: vec![InvoiceItem {
                description: format!("{ITEM_DESCRIPTION_PREFIX}{}", payment.form_title),
                price_cents: charge_cents(payment.price),
                quantity: 1,
            }],
        };

        let outcome = self.api.create_invoice(request).await?;

        if let InvoiceOutcome::Created(invoice) = &outcome {
            tracing::info!(invoice = %invoice.id, "invoice created");

            if settings.is_on(keys::VERIFY_INVOICE) {
                let fetched = self.api.fetch_invoice(&invoice.id).await?;
                return Ok(InvoiceOutcome::Created(fetched));
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockIuguApi;
    use chrono::TimeZone;
    use donation_core::{DonationSubmission, MemorySettingsStore};
    use rust_decimal_macros::dec;

    fn payment_data(price: Decimal) -> PaymentData {
        let submission = DonationSubmission {
            price,
            form_title: "Campanha do Agasalho".into(),
            period_mode: "once".into(),
            form_id: 7,
            price_id: None,
            user_email: "donor@example.com".into(),
            first_name: "Maria".into(),
            last_name: "Silva".into(),
            purchase_key: None,
            gateway: "iugu".into(),
            nonce: "tok".into(),
        };
        PaymentData::pending(&submission, "BRL".into(), Utc::now())
    }

    #[test]
    fn test_charge_converts_to_cents() {
        assert_eq!(charge_cents(dec!(25.00)), 2500);
        assert_eq!(charge_cents(dec!(12.34)), 1234);
        assert_eq!(charge_cents(dec!(1.00)), 100);
    }

    #[test]
    fn test_charge_clamps_below_one_unit() {
        assert_eq!(charge_cents(dec!(0.99)), 100);
        assert_eq!(charge_cents(dec!(0.01)), 100);
        assert_eq!(charge_cents(dec!(0)), 100);
    }

    #[test]
    fn test_due_date_is_six_calendar_days_out() {
        let from = Utc.with_ymd_and_hms(2026, 1, 31, 23, 15, 0).unwrap();
        assert_eq!(due_date(from), "2026-02-06");

        let from = Utc.with_ymd_and_hms(2026, 8, 6, 0, 0, 0).unwrap();
        assert_eq!(due_date(from), "2026-08-12");
    }

    #[test]
    fn test_test_flag_selects_test_token() {
        let settings = MemorySettingsStore::new();
        settings.set(keys::TEST_TOKEN, "tok-test");
        settings.set(keys::USER_TOKEN, "tok-user");
        settings.set(keys::TEST_ENABLED, "on");

        let (mode, token) = resolve_credential(&settings).unwrap();
        assert_eq!(mode, ApiMode::Test);
        assert_eq!(token, "tok-test");
    }

    #[test]
    fn test_live_prefers_user_token() {
        let settings = MemorySettingsStore::new();
        settings.set(keys::USER_TOKEN, "tok-user");
        settings.set(keys::LIVE_TOKEN, "tok-live");

        let (mode, token) = resolve_credential(&settings).unwrap();
        assert_eq!(mode, ApiMode::Live);
        assert_eq!(token, "tok-user");
    }

    #[test]
    fn test_live_falls_back_to_live_token() {
        let settings = MemorySettingsStore::new();
        settings.set(keys::LIVE_TOKEN, "tok-live");

        let (_, token) = resolve_credential(&settings).unwrap();
        assert_eq!(token, "tok-live");
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let settings = MemorySettingsStore::new();
        settings.set(keys::TEST_ENABLED, "on");

        let result = resolve_credential(&settings);
        assert!(matches!(result, Err(IuguError::MissingToken("test"))));
    }

    #[tokio::test]
    async fn test_send_builds_invoice_from_payment_and_settings() {
        let settings = MemorySettingsStore::new();
        settings.set(keys::ACCOUNT_EMAIL, "merchant@example.com");

        let api = Arc::new(MockIuguApi::new());
        let sender = InvoiceSender::new(api.clone());

        let outcome = sender.send(&settings, &payment_data(dec!(25.00))).await.unwrap();
        assert!(matches!(outcome, InvoiceOutcome::Created(_)));

        let customers = api.customer_requests();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].email, "donor@example.com");
        assert_eq!(customers[0].name, "Maria Silva");

        let invoices = api.invoice_requests();
        assert_eq!(invoices.len(), 1);
        let request = &invoices[0];
        assert_eq!(request.customer_id, "mock-customer");
        assert_eq!(request.email, "merchant@example.com");
        assert_eq!(request.payable_with, "all");
        assert!(request.ensure_workday_due_date);
        assert_eq!(request.items.len(), 1);
        assert_eq!(request.items[0].description, "Doação Campanha do Agasalho");
        assert_eq!(request.items[0].price_cents, 2500);
        assert_eq!(request.items[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_send_does_not_refetch_by_default() {
        let settings = MemorySettingsStore::new();
        let api = Arc::new(MockIuguApi::new());
        let sender = InvoiceSender::new(api.clone());

        sender.send(&settings, &payment_data(dec!(10))).await.unwrap();
        assert_eq!(api.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_send_refetches_when_verification_enabled() {
        let settings = MemorySettingsStore::new();
        settings.set(keys::VERIFY_INVOICE, "on");

        let api = Arc::new(MockIuguApi::new());
        let sender = InvoiceSender::new(api.clone());

        let outcome = sender.send(&settings, &payment_data(dec!(10))).await.unwrap();
        assert_eq!(api.fetch_count(), 1);
        assert!(matches!(outcome, InvoiceOutcome::Created(_)));
    }

    #[tokio::test]
    async fn test_send_propagates_transport_faults() {
        let settings = MemorySettingsStore::new();
        let sender = InvoiceSender::new(Arc::new(MockIuguApi::failing()));

        let result = sender.send(&settings, &payment_data(dec!(10))).await;
        assert!(matches!(result, Err(IuguError::Transport(_))));
    }
}
