//! Provider webhook verification
//!
//! Razorpay signs webhook deliveries with `hex(HMAC-SHA256(webhook_secret, raw_body))`
//! and sends the digest in the `X-Razorpay-Signature` header. The body must be
//! verified byte-for-byte before it is parsed.

use crate::error::{PaymentError, PaymentResult};
use crate::payments::signature::{hmac_sha256_hex, signatures_match};
use crate::payments::types::WebhookEvent;
use tracing::warn;

pub const SIGNATURE_HEADER: &str = "x-razorpay-signature";

#[derive(Clone)]
pub struct WebhookVerifier {
    secret: Option<String>,
}

impl WebhookVerifier {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.trim().is_empty()),
        }
    }

    /// Verify the signature over the raw body, then parse the event.
    pub fn verify(&self, payload: &[u8], signature: Option<&str>) -> PaymentResult<WebhookEvent> {
        let secret = self
            .secret
            .as_deref()
            .ok_or_else(|| PaymentError::configuration("Webhook secret is not configured"))?;

        let signature = signature
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PaymentError::validation("Missing X-Razorpay-Signature header"))?;

        let expected = hmac_sha256_hex(secret, payload);
        if !signatures_match(&expected, signature) {
            warn!("Webhook signature mismatch ({} byte payload)", payload.len());
            return Err(PaymentError::VerificationFailed);
        }

        serde_json::from_slice(payload)
            .map_err(|e| PaymentError::validation(format!("Malformed webhook payload: {}", e)))
    }
}
