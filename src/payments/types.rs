//! Payment types and data structures
//!
//! Provider-agnostic requests and results passed between the HTTP layer,
//! the order issuer, the verifier and the provider adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A caller's request to buy a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    /// Amount in smallest currency unit (e.g., paise for INR)
    pub amount: Option<i64>,
    /// ISO 4217 currency code; the configured default applies when absent
    pub currency: Option<String>,
    pub plan_id: Option<String>,
    pub plan_name: Option<String>,
}

/// Order issued by the payment provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    /// Provider-issued opaque order id
    pub id: String,
    pub amount: u64,
    pub currency: String,
    pub receipt: String,
}

/// Reconciliation data attached to a provider order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderNotes {
    #[serde(rename = "planId")]
    pub plan_id: String,
    #[serde(rename = "planName")]
    pub plan_name: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// Validated order as handed to a provider adapter
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewProviderOrder {
    pub amount: u64,
    pub currency: String,
    pub receipt: String,
    pub notes: OrderNotes,
}

/// API credentials borrowed from configuration for a single provider call
#[derive(Clone, Copy)]
pub struct ProviderCredentials<'a> {
    pub key_id: &'a str,
    pub key_secret: &'a str,
}

impl std::fmt::Debug for ProviderCredentials<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .finish()
    }
}

/// Completed-payment callback posted by the client after checkout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationRequest {
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    /// Provider signature, lowercase hex
    pub signature: Option<String>,
    pub plan_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VerificationResult {
    pub verified: bool,
    pub payment_id: String,
    pub order_id: String,
}

/// Order issued to a caller, kept until the payment for it is verified
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingOrder {
    pub order_id: String,
    pub user_id: String,
    pub plan_id: String,
    pub amount: u64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

/// How a subscription came to be recorded
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionSource {
    Checkout,
    Webhook,
}

/// Plan a caller has paid for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    pub user_id: String,
    pub plan_id: String,
    pub order_id: String,
    pub payment_id: String,
    pub source: SubscriptionSource,
    pub activated_at: DateTime<Utc>,
}

/// Provider webhook envelope
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub payload: WebhookPayload,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct WebhookPayload {
    #[serde(default)]
    pub payment: Option<WebhookPaymentWrapper>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct WebhookPaymentWrapper {
    pub entity: WebhookPayment,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct WebhookPayment {
    pub id: String,
    pub order_id: Option<String>,
    pub amount: u64,
    pub currency: String,
    pub status: String,
    /// Unix seconds when the payment was created
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub notes: serde_json::Value,
}

impl WebhookEvent {
    /// The payment entity carried by `payment.*` events
    pub fn payment(&self) -> Option<&WebhookPayment> {
        self.payload.payment.as_ref().map(|p| &p.entity)
    }
}

impl WebhookPayment {
    fn note(&self, key: &str) -> Option<&str> {
        self.notes
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    pub fn user_id(&self) -> Option<&str> {
        self.note("userId")
    }

    pub fn plan_id(&self) -> Option<&str> {
        self.note("planId")
    }

    /// Payment creation time, falling back to now when the event omits it
    pub fn created_at_utc(&self) -> DateTime<Utc> {
        self.created_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or_else(Utc::now)
    }
}
