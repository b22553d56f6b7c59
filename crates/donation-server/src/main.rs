//! donation-gateway HTTP Server
//!
//! Axum-based server exposing the donation checkout flow: a submission
//! is recorded locally, invoiced through the Iugu gateway, and the
//! donor is redirected to the hosted payment page.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use donation_core::{HmacNonceVerifier, MemoryGatewayLog, MemoryPaymentStore, MemorySettingsStore};
use donation_iugu::resolve_credential;

use crate::handlers::{health_check, issue_token, process_donation};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let settings = Arc::new(load_settings());

    match resolve_credential(settings.as_ref()) {
        Ok((mode, _)) => tracing::info!(mode = mode.as_str(), "✓ Iugu credentials configured"),
        Err(_) => {
            tracing::warn!("⚠ Iugu tokens not configured - submissions will fail");
            tracing::warn!("  Set GATEWAY_USER_TOKEN (or GATEWAY_TEST_TOKEN + GATEWAY_TEST_ENABLED=on)");
        }
    }

    let nonce_secret = std::env::var("GATEWAY_NONCE_SECRET").unwrap_or_else(|_| {
        tracing::warn!("⚠ GATEWAY_NONCE_SECRET not set - tokens will not survive a restart");
        uuid::Uuid::new_v4().to_string()
    });

    // Build application state
    let state = AppState {
        settings,
        payments: Arc::new(MemoryPaymentStore::new()),
        gateway_log: Arc::new(MemoryGatewayLog::new()),
        nonces: Arc::new(HmacNonceVerifier::new(nonce_secret)),
        iugu: None,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/donations", post(process_donation))
        .route("/donations/token", get(issue_token))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 donation-gateway server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health          - Health check");
    tracing::info!("  GET  /donations/token - Checkout anti-forgery token");
    tracing::info!("  POST /donations       - Process a donation");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Seed the settings store from `GATEWAY_*` environment variables
fn load_settings() -> MemorySettingsStore {
    let settings = MemorySettingsStore::new();

    for key in donation_core::keys::ALL {
        let var = format!("GATEWAY_{}", key.to_uppercase());
        if let Ok(value) = std::env::var(&var) {
            settings.set(*key, value);
        }
    }

    settings
}
