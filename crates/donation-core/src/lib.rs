//! # donation-core
//!
//! Domain types and host-platform seams for the donation gateway.
//!
//! The gateway adapter consumes a handful of services owned by the host
//! platform: option storage, payment recording, gateway-error logging,
//! and anti-forgery token verification. Each is modeled here as a trait
//! with an in-memory reference implementation, so the checkout flow can
//! run and be tested without the real platform behind it:
//!
//! - [`SettingsStore`] / [`MemorySettingsStore`]: string-keyed options
//!   plus per-form currency resolution
//! - [`PaymentStore`] / [`MemoryPaymentStore`]: pending-payment
//!   creation and status transitions
//! - [`GatewayLog`] / [`MemoryGatewayLog`]: structured gateway-error
//!   records for reconciliation
//! - [`NonceVerifier`] / [`HmacNonceVerifier`]: anti-forgery tokens
//!   for the checkout form

mod error;
mod nonce;
mod payment;
mod settings;
mod store;

pub use error::{GatewayError, Result};
pub use nonce::{HmacNonceVerifier, NonceVerifier};
pub use payment::{DonationSubmission, PaymentData, PaymentId, PaymentStatus, UserInfo};
pub use settings::{DEFAULT_CURRENCY, MemorySettingsStore, SettingsStore, keys};
pub use store::{GatewayErrorEntry, GatewayLog, MemoryGatewayLog, MemoryPaymentStore, PaymentStore};
