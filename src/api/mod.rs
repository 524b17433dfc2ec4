//! HTTP surface: shared state, router assembly and handlers.

pub mod error;
pub mod health;
pub mod payments;

use std::sync::Arc;

use axum::{
    http::{HeaderName, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{route_gate, GateState};
use crate::config::Config;
use crate::payments::{OrderIssuer, OrderProvider, PaymentVerifier, SubscriptionStore, WebhookVerifier};
use error::ErrorResponse;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Dependencies shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub issuer: Arc<OrderIssuer>,
    pub verifier: Arc<PaymentVerifier>,
    pub webhooks: Arc<WebhookVerifier>,
    pub subscriptions: Arc<dyn SubscriptionStore>,
    pub environment: Arc<str>,
    pub payments_configured: bool,
    pub webhooks_configured: bool,
}

impl AppState {
    pub fn new(
        config: &Config,
        provider: Arc<dyn OrderProvider>,
        subscriptions: Arc<dyn SubscriptionStore>,
    ) -> Self {
        let payments = &config.payments;
        Self {
            issuer: Arc::new(OrderIssuer::new(
                provider,
                payments.key_id.clone(),
                payments.key_secret.clone(),
                payments.default_currency.clone(),
            )),
            verifier: Arc::new(PaymentVerifier::new(payments.signing_secret.clone())),
            webhooks: Arc::new(WebhookVerifier::new(payments.webhook_secret.clone())),
            subscriptions,
            environment: Arc::from(config.server.environment.as_str()),
            payments_configured: payments.is_configured(),
            webhooks_configured: payments.webhook_secret.is_some(),
        }
    }
}

pub fn router(state: AppState, gate: GateState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/razorpay/create-order", post(payments::create_order))
        .route("/api/razorpay/verify-payment", post(payments::verify_payment))
        .route("/api/webhooks/razorpay", post(payments::razorpay_webhook))
        .route("/api/subscription", get(payments::current_subscription))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(gate, route_gate))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "NOT_FOUND".to_string(),
            message: "Route not found".to_string(),
        }),
    )
}
