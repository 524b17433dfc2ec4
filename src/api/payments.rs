//! Checkout, verification, webhook and subscription endpoints.

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::{ApiError, ErrorResponse};
use super::AppState;
use crate::auth::RequireAuth;
use crate::error::PaymentError;
use crate::payments::types::{
    Order, OrderRequest, PendingOrder, SubscriptionRecord, SubscriptionSource,
    VerificationRequest,
};
use crate::payments::webhook::SIGNATURE_HEADER;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderBody {
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub plan_id: Option<String>,
    pub plan_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentBody {
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
    #[serde(rename = "planId")]
    pub plan_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
    pub payment_id: String,
    pub order_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| PaymentError::validation(rejection.body_text()).into())
}

/// POST /api/razorpay/create-order
pub async fn create_order(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    payload: Result<Json<CreateOrderBody>, JsonRejection>,
) -> Result<Json<Order>, ApiError> {
    let body = json_body(payload)?;
    let plan_id = body
        .plan_id
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    let order = state
        .issuer
        .create_order(
            &caller,
            OrderRequest {
                amount: body.amount,
                currency: body.currency,
                plan_id: body.plan_id,
                plan_name: body.plan_name,
            },
        )
        .await?;

    state
        .subscriptions
        .record_pending_order(PendingOrder {
            order_id: order.id.clone(),
            user_id: caller.user_id.clone(),
            plan_id,
            amount: order.amount,
            currency: order.currency.clone(),
            created_at: Utc::now(),
        })
        .await?;

    Ok(Json(order))
}

/// POST /api/razorpay/verify-payment
pub async fn verify_payment(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    payload: Result<Json<VerifyPaymentBody>, JsonRejection>,
) -> Result<Json<VerifyPaymentResponse>, ApiError> {
    let body = json_body(payload)?;
    let plan_id = body.plan_id.filter(|p| !p.trim().is_empty());

    let result = state.verifier.verify(VerificationRequest {
        order_id: body.razorpay_order_id,
        payment_id: body.razorpay_payment_id,
        signature: body.razorpay_signature,
        plan_id: plan_id.clone(),
    })?;

    // The plan comes from the order as issued, never from the callback body
    let pending = match state.subscriptions.pending_order(&result.order_id).await? {
        Some(pending) if pending.user_id == caller.user_id => pending,
        Some(pending) => {
            warn!(
                "User {} tried to verify order {} issued to user {}",
                caller.user_id, result.order_id, pending.user_id
            );
            return Err(PaymentError::VerificationFailed.into());
        }
        None => {
            warn!(
                "Verified payment {} references unknown order {}",
                result.payment_id, result.order_id
            );
            return Err(PaymentError::VerificationFailed.into());
        }
    };
    if let Some(plan_id) = plan_id {
        if plan_id.trim() != pending.plan_id {
            warn!(
                "planId {} does not match plan {} of order {}",
                plan_id, pending.plan_id, result.order_id
            );
            return Err(PaymentError::VerificationFailed.into());
        }
    }

    state
        .subscriptions
        .record(SubscriptionRecord {
            user_id: caller.user_id.clone(),
            plan_id: pending.plan_id,
            order_id: result.order_id.clone(),
            payment_id: result.payment_id.clone(),
            source: SubscriptionSource::Checkout,
            activated_at: Utc::now(),
        })
        .await?;

    Ok(Json(VerifyPaymentResponse {
        success: result.verified,
        message: "Payment verified successfully".to_string(),
        payment_id: result.payment_id,
        order_id: result.order_id,
    }))
}

/// POST /api/webhooks/razorpay
pub async fn razorpay_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
    let event = state.webhooks.verify(&body, signature)?;

    match (event.event.as_str(), event.payment()) {
        ("payment.captured", Some(payment)) => match (payment.user_id(), payment.plan_id()) {
            (Some(user_id), Some(plan_id)) => {
                state
                    .subscriptions
                    .record(SubscriptionRecord {
                        user_id: user_id.to_string(),
                        plan_id: plan_id.to_string(),
                        order_id: payment.order_id.clone().unwrap_or_default(),
                        payment_id: payment.id.clone(),
                        source: SubscriptionSource::Webhook,
                        activated_at: payment.created_at_utc(),
                    })
                    .await?;
            }
            _ => warn!(
                "Captured payment {} has no userId/planId notes; nothing recorded",
                payment.id
            ),
        },
        (other, _) => info!("Acknowledged Razorpay webhook event: {}", other),
    }

    Ok(Json(WebhookAck { received: true }))
}

/// GET /api/subscription
pub async fn current_subscription(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
) -> Result<Response, ApiError> {
    match state.subscriptions.current_for(&caller.user_id).await? {
        Some(record) => Ok(Json(record).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "NOT_FOUND".to_string(),
                message: "No active subscription".to_string(),
            }),
        )
            .into_response()),
    }
}
