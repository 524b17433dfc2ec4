//! Checkout signature verification
//!
//! After checkout the provider hands the client an order id, a payment id and
//! a signature. The signature is `hex(HMAC-SHA256(secret, "<order_id>|<payment_id>"))`;
//! recomputing it here is what proves the callback came from the provider.

use crate::error::{PaymentError, PaymentResult};
use crate::payments::signature::{hmac_sha256_hex, signatures_match};
use crate::payments::types::{VerificationRequest, VerificationResult};
use tracing::{info, warn};

#[derive(Clone)]
pub struct PaymentVerifier {
    signing_secret: Option<String>,
}

impl PaymentVerifier {
    pub fn new(signing_secret: Option<String>) -> Self {
        Self {
            signing_secret: signing_secret.filter(|s| !s.trim().is_empty()),
        }
    }

    /// Signature the provider is expected to have produced for this pair.
    pub fn expected_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
        let message = format!("{}|{}", order_id, payment_id);
        hmac_sha256_hex(secret, message.as_bytes())
    }

    /// Attest that a completed-payment callback was issued by the provider.
    ///
    /// Persists nothing; recording the subscription is up to the caller.
    pub fn verify(&self, request: VerificationRequest) -> PaymentResult<VerificationResult> {
        let order_id = required(request.order_id, "razorpay_order_id")?;
        let payment_id = required(request.payment_id, "razorpay_payment_id")?;
        let signature = required(request.signature, "razorpay_signature")?;

        let secret = self
            .signing_secret
            .as_deref()
            .ok_or_else(|| PaymentError::configuration("Payment signing secret is not configured"))?;

        let expected = Self::expected_signature(secret, &order_id, &payment_id);
        if !signatures_match(&expected, &signature) {
            warn!(
                "Payment signature mismatch: order_id={}, payment_id={}",
                order_id, payment_id
            );
            return Err(PaymentError::VerificationFailed);
        }

        info!(
            "Payment verified: order_id={}, payment_id={}",
            order_id, payment_id
        );

        Ok(VerificationResult {
            verified: true,
            payment_id,
            order_id,
        })
    }
}

fn required(value: Option<String>, field: &str) -> PaymentResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PaymentError::validation(format!("Missing required field: {}", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "testsecret";
    const DIGEST: &str = "3dd5062c53f808ef094a994bb1e6be30c96d9d105a92a3e9d2bf1e23d040971a";

    fn request(signature: &str) -> VerificationRequest {
        VerificationRequest {
            order_id: Some("order_abc".to_string()),
            payment_id: Some("pay_xyz".to_string()),
            signature: Some(signature.to_string()),
            plan_id: Some("plan_family".to_string()),
        }
    }

    #[test]
    fn test_expected_signature_is_deterministic() {
        let first = PaymentVerifier::expected_signature(SECRET, "order_abc", "pay_xyz");
        let second = PaymentVerifier::expected_signature(SECRET, "order_abc", "pay_xyz");
        assert_eq!(first, DIGEST);
        assert_eq!(first, second);
    }

    #[test]
    fn test_verify_accepts_correct_signature() {
        let verifier = PaymentVerifier::new(Some(SECRET.to_string()));
        let result = verifier.verify(request(DIGEST)).unwrap();
        assert!(result.verified);
        assert_eq!(result.order_id, "order_abc");
        assert_eq!(result.payment_id, "pay_xyz");
    }

    #[test]
    fn test_verify_rejects_reversed_and_truncated_digest() {
        let verifier = PaymentVerifier::new(Some(SECRET.to_string()));

        let reversed: String = DIGEST.chars().rev().collect();
        assert_eq!(verifier.verify(request(&reversed)), Err(PaymentError::VerificationFailed));

        let truncated = &DIGEST[..32];
        assert_eq!(verifier.verify(request(truncated)), Err(PaymentError::VerificationFailed));

        let uppercase = DIGEST.to_uppercase();
        assert_eq!(verifier.verify(request(&uppercase)), Err(PaymentError::VerificationFailed));
    }

    #[test]
    fn test_verify_rejects_signature_from_other_secret() {
        let verifier = PaymentVerifier::new(Some(SECRET.to_string()));
        let forged = PaymentVerifier::expected_signature("othersecret", "order_abc", "pay_xyz");
        assert_eq!(verifier.verify(request(&forged)), Err(PaymentError::VerificationFailed));
    }

    #[test]
    fn test_round_trip_for_arbitrary_ids() {
        let verifier = PaymentVerifier::new(Some("k3y".to_string()));
        for (order_id, payment_id) in [("order_1", "pay_1"), ("order_Zx9", "pay_AbC"), ("o", "p")] {
            let signature = PaymentVerifier::expected_signature("k3y", order_id, payment_id);
            let result = verifier
                .verify(VerificationRequest {
                    order_id: Some(order_id.to_string()),
                    payment_id: Some(payment_id.to_string()),
                    signature: Some(signature),
                    plan_id: None,
                })
                .unwrap();
            assert!(result.verified);
        }
    }

    #[test]
    fn test_missing_fields_are_validation_errors() {
        let verifier = PaymentVerifier::new(Some(SECRET.to_string()));

        let mut req = request(DIGEST);
        req.order_id = None;
        assert!(matches!(verifier.verify(req), Err(PaymentError::Validation { .. })));

        let mut req = request(DIGEST);
        req.payment_id = Some("  ".to_string());
        assert!(matches!(verifier.verify(req), Err(PaymentError::Validation { .. })));

        let mut req = request(DIGEST);
        req.signature = None;
        assert!(matches!(verifier.verify(req), Err(PaymentError::Validation { .. })));
    }

    #[test]
    fn test_missing_secret_is_configuration_error() {
        let verifier = PaymentVerifier::new(None);
        assert!(matches!(
            verifier.verify(request(DIGEST)),
            Err(PaymentError::Configuration { .. })
        ));

        let verifier = PaymentVerifier::new(Some(String::new()));
        assert!(matches!(
            verifier.verify(request(DIGEST)),
            Err(PaymentError::Configuration { .. })
        ));
    }

    #[test]
    fn test_validation_precedes_configuration() {
        let verifier = PaymentVerifier::new(None);
        let req = VerificationRequest::default();
        assert!(matches!(verifier.verify(req), Err(PaymentError::Validation { .. })));
    }
}
