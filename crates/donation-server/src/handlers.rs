//! HTTP Handlers
//!
//! The donation entry point is a two-fork state machine: the pending
//! record either persists or the donor goes back to checkout; the
//! remote invoice is either created (redirect to its hosted payment
//! page) or refused (inline error, payment stays pending for manual
//! reconciliation).

use axum::{
    Json,
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Serialize;

use donation_core::{DonationSubmission, GatewayError, PaymentData, PaymentStatus, keys};
use donation_iugu::{InvoiceOutcome, InvoiceRejection, InvoiceSender, IuguError, resolve_credential};

use crate::state::AppState;

/// Action name bound into checkout anti-forgery tokens
pub const GATEWAY_ACTION: &str = "donation-gateway";

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub gateway_configured: bool,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub nonce: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let gateway_configured =
        state.iugu.is_some() || resolve_credential(state.settings.as_ref()).is_ok();

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        gateway_configured,
    })
}

/// Anti-forgery token for the checkout form
pub async fn issue_token(State(state): State<AppState>) -> Json<TokenResponse> {
    Json(TokenResponse {
        nonce: state.nonces.issue(GATEWAY_ACTION),
    })
}

/// Donation checkout entry point
pub async fn process_donation(
    State(state): State<AppState>,
    Form(submission): Form<DonationSubmission>,
) -> Response {
    // Nothing is written before the token verifies
    if !state.nonces.verify(&submission.nonce, GATEWAY_ACTION) {
        return (StatusCode::FORBIDDEN, "Nonce verification failed.").into_response();
    }

    let currency = state.settings.currency_for(submission.form_id);
    let data = PaymentData::pending(&submission, currency, Utc::now());

    // Record the pending payment ahead of any remote call
    let payment_id = match state.payments.insert(&data) {
        Ok(id) => id,
        Err(error) => {
            record_payment_failure(&state, &data, &error);
            return checkout_redirect(&state, &submission.gateway);
        }
    };

    let sender = match &state.iugu {
        Some(api) => InvoiceSender::new(api.clone()),
        None => match InvoiceSender::from_settings(state.settings.as_ref()) {
            Ok(sender) => sender,
            Err(error) => {
                state
                    .gateway_log
                    .record_error("Gateway Error", &error.to_string(), Some(payment_id));
                return gateway_unavailable(&error);
            }
        },
    };

    match sender.send(state.settings.as_ref(), &data).await {
        Ok(InvoiceOutcome::Created(invoice)) => {
            if let Err(error) = state.payments.update_status(payment_id, PaymentStatus::Publish) {
                tracing::error!(payment = %payment_id, error = %error, "failed to publish payment");
            }

            tracing::info!(payment = %payment_id, invoice = %invoice.id, "donation invoiced");
            Redirect::to(&invoice.secure_url).into_response()
        }
        Ok(InvoiceOutcome::Rejected(rejection)) => {
            // Payment stays pending for manual reconciliation
            tracing::warn!(payment = %payment_id, "invoice rejected by gateway");
            Html(render_rejection(&rejection)).into_response()
        }
        Err(error) => {
            state
                .gateway_log
                .record_error("Gateway Error", &error.to_string(), Some(payment_id));
            gateway_unavailable(&error)
        }
    }
}

// ============================================================================
// Terminal responses
// ============================================================================

fn record_payment_failure(state: &AppState, data: &PaymentData, error: &GatewayError) {
    let serialized = data
        .to_json()
        .unwrap_or_else(|e| format!("<unserializable: {e}>"));
    let detail = format!(
        "The payment creation failed before the gateway hand-off ({error}). Payment data: {serialized}"
    );

    state.gateway_log.record_error("Payment Error", &detail, None);
}

fn checkout_redirect(state: &AppState, gateway: &str) -> Response {
    let base = state
        .settings
        .get(keys::CHECKOUT_URL)
        .unwrap_or_else(|| "/".into());

    Redirect::to(&format!("{base}?payment-mode={gateway}")).into_response()
}

fn gateway_unavailable(error: &IuguError) -> Response {
    let body = format!(
        "<h1>Payment Gateway Error</h1><br/>{}",
        error.user_message()
    );
    (StatusCode::BAD_GATEWAY, Html(body)).into_response()
}

/// Inline error block for an invoice the API refused; field names and
/// messages are rendered as returned
fn render_rejection(rejection: &InvoiceRejection) -> String {
    let mut out = String::from("<h1>Payment Gateway Error</h1><br/>");
    out.push_str(
        "Configuration error has occurred at the payment gateway, please inform the owner of the website.",
    );

    match rejection {
        InvoiceRejection::Fields(fields) => {
            for (name, messages) in fields {
                out.push_str("<br/>");
                out.push_str(&format!("<strong>{name}:</strong>"));
                for message in messages {
                    out.push_str(&format!("<span>{message}</span>,"));
                }
            }
            out.push_str("<br/>");
        }
        InvoiceRejection::Message(message) => {
            out.push_str(&format!("<br/><strong>{message}</strong><br/>"));
        }
    }

    out
}
