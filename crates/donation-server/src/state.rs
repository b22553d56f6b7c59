//! Application State

use std::sync::Arc;

use donation_core::{GatewayLog, NonceVerifier, PaymentStore, SettingsStore};
use donation_iugu::IuguApi;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Gateway settings (merchant account, tokens, flags)
    pub settings: Arc<dyn SettingsStore>,

    /// Local payment records
    pub payments: Arc<dyn PaymentStore>,

    /// Gateway-error log for reconciliation
    pub gateway_log: Arc<dyn GatewayLog>,

    /// Anti-forgery tokens for the checkout form
    pub nonces: Arc<dyn NonceVerifier>,

    /// Preconfigured API override (tests, demos); `None` resolves a
    /// live client from settings on each submission
    pub iugu: Option<Arc<dyn IuguApi>>,
}
