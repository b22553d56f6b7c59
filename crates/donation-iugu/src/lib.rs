//! # donation-iugu
//!
//! Iugu invoice gateway for donation checkout.
//!
//! ## Flow
//!
//! Hosted-invoice approach: the donor never enters payment details on
//! this service. The gateway creates a remote customer and an invoice,
//! then the donor is redirected to the payment page Iugu hosts.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐     ┌──────────────────┐
//! │   Checkout   │────▶│  donation-server │────▶│   Iugu hosted    │
//! │   (donor)    │     │  (this gateway)  │     │   invoice page   │
//! └──────────────┘     └──────────────────┘     └──────────────────┘
//! ```
//!
//! Remote rejections are resolved once at the client boundary into
//! [`InvoiceOutcome`]; transport-level faults surface as [`IuguError`]
//! and never masquerade as a rejection payload.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use donation_iugu::{InvoiceOutcome, InvoiceSender};
//!
//! let sender = InvoiceSender::from_settings(settings.as_ref())?;
//! match sender.send(settings.as_ref(), &payment).await? {
//!     InvoiceOutcome::Created(invoice) => redirect_to(&invoice.secure_url),
//!     InvoiceOutcome::Rejected(rejection) => render_error(&rejection),
//! }
//! ```

mod client;
mod error;
mod invoice;
mod mock;
mod payer;

pub use client::{
    Customer, CustomerRequest, Invoice, InvoiceItem, InvoiceOutcome, InvoiceRejection,
    InvoiceRequest, IuguApi, IuguClient,
};
pub use error::{IuguError, Result};
pub use invoice::{ApiMode, InvoiceSender, charge_cents, due_date, resolve_credential};
pub use mock::MockIuguApi;
pub use payer::{PAYER_COUNTRY, Payer, PayerAddress, build_payer};
