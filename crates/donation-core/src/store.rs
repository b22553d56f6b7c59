//! Payment Store & Gateway Log
//!
//! Seams to the host platform's payment-recording subsystem. A pending
//! payment record must exist before any remote gateway call; the
//! gateway log keeps reconciliation context when that record cannot be
//! created or the remote side misbehaves.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::error::{GatewayError, Result};
use crate::payment::{PaymentData, PaymentId, PaymentStatus};

/// Payment storage trait
pub trait PaymentStore: Send + Sync {
    /// Persist a new payment record, returning its identifier
    fn insert(&self, data: &PaymentData) -> Result<PaymentId>;

    /// Transition an existing record to a new status
    fn update_status(&self, id: PaymentId, status: PaymentStatus) -> Result<()>;

    /// Fetch a record by id
    fn get(&self, id: PaymentId) -> Result<Option<PaymentData>>;
}

/// Structured gateway-error recorder
pub trait GatewayLog: Send + Sync {
    /// Record one gateway error, optionally tied to a payment record
    fn record_error(&self, title: &str, detail: &str, payment: Option<PaymentId>);
}

/// One recorded gateway error
#[derive(Clone, Debug)]
pub struct GatewayErrorEntry {
    pub title: String,
    pub detail: String,
    pub payment: Option<PaymentId>,
    pub at: DateTime<Utc>,
}

/// In-memory payment store (for development and tests)
pub struct MemoryPaymentStore {
    payments: RwLock<HashMap<PaymentId, PaymentData>>,
}

impl Default for MemoryPaymentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPaymentStore {
    pub fn new() -> Self {
        Self {
            payments: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.payments.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all stored records
    pub fn records(&self) -> Vec<(PaymentId, PaymentData)> {
        self.payments
            .read()
            .unwrap()
            .iter()
            .map(|(id, data)| (*id, data.clone()))
            .collect()
    }
}

impl PaymentStore for MemoryPaymentStore {
    fn insert(&self, data: &PaymentData) -> Result<PaymentId> {
        let id = PaymentId::new();
        self.payments.write().unwrap().insert(id, data.clone());

        tracing::debug!(payment = %id, status = %data.status, "payment recorded");
        Ok(id)
    }

    fn update_status(&self, id: PaymentId, status: PaymentStatus) -> Result<()> {
        let mut payments = self.payments.write().unwrap();

        match payments.get_mut(&id) {
            Some(data) => {
                data.status = status;
                tracing::debug!(payment = %id, status = %status, "payment status updated");
                Ok(())
            }
            None => Err(GatewayError::PaymentNotFound(id)),
        }
    }

    fn get(&self, id: PaymentId) -> Result<Option<PaymentData>> {
        Ok(self.payments.read().unwrap().get(&id).cloned())
    }
}

/// In-memory gateway log (for development and tests)
pub struct MemoryGatewayLog {
    entries: RwLock<Vec<GatewayErrorEntry>>,
}

impl Default for MemoryGatewayLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGatewayLog {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn entries(&self) -> Vec<GatewayErrorEntry> {
        self.entries.read().unwrap().clone()
    }
}

impl GatewayLog for MemoryGatewayLog {
    fn record_error(&self, title: &str, detail: &str, payment: Option<PaymentId>) {
        tracing::error!(title, payment = ?payment, detail, "gateway error");

        self.entries.write().unwrap().push(GatewayErrorEntry {
            title: title.into(),
            detail: detail.into(),
            payment,
            at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::{DonationSubmission, UserInfo};
    use rust_decimal_macros::dec;

    fn payment_data() -> PaymentData {
        let submission = DonationSubmission {
            price: dec!(10),
            form_title: "Fundo Geral".into(),
            period_mode: String::new(),
            form_id: 1,
            price_id: None,
            user_email: "donor@example.com".into(),
            first_name: "Ana".into(),
            last_name: "Souza".into(),
            purchase_key: None,
            gateway: "iugu".into(),
            nonce: "tok".into(),
        };
        PaymentData::pending(&submission, "BRL".into(), Utc::now())
    }

    #[test]
    fn test_insert_then_publish() {
        let store = MemoryPaymentStore::new();
        let id = store.insert(&payment_data()).unwrap();

        assert_eq!(store.get(id).unwrap().unwrap().status, PaymentStatus::Pending);

        store.update_status(id, PaymentStatus::Publish).unwrap();
        assert_eq!(store.get(id).unwrap().unwrap().status, PaymentStatus::Publish);
    }

    #[test]
    fn test_update_unknown_payment_fails() {
        let store = MemoryPaymentStore::new();
        let result = store.update_status(PaymentId::new(), PaymentStatus::Publish);

        assert!(matches!(result, Err(GatewayError::PaymentNotFound(_))));
    }

    #[test]
    fn test_user_info_survives_round_trip() {
        let store = MemoryPaymentStore::new();
        let id = store.insert(&payment_data()).unwrap();

        let stored = store.get(id).unwrap().unwrap();
        assert_eq!(
            stored.user_info,
            UserInfo {
                first_name: "Ana".into(),
                last_name: "Souza".into(),
            }
        );
    }

    #[test]
    fn test_gateway_log_keeps_entries_in_order() {
        let log = MemoryGatewayLog::new();
        log.record_error("Payment Error", "first", None);
        log.record_error("Invoice Error", "second", Some(PaymentId::new()));

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].detail, "first");
        assert!(entries[1].payment.is_some());
    }
}
