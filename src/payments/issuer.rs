//! Order issuance
//!
//! Validates a plan purchase, checks that provider credentials are present and
//! asks the provider for an order. Each call creates a new provider order.

use crate::auth::CallerIdentity;
use crate::error::{PaymentError, PaymentResult};
use crate::payments::traits::OrderProvider;
use crate::payments::types::{NewProviderOrder, Order, OrderNotes, OrderRequest, ProviderCredentials};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderIssuer {
    provider: Arc<dyn OrderProvider>,
    key_id: Option<String>,
    key_secret: Option<String>,
    default_currency: String,
}

impl OrderIssuer {
    pub fn new(
        provider: Arc<dyn OrderProvider>,
        key_id: Option<String>,
        key_secret: Option<String>,
        default_currency: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            key_id: key_id.filter(|s| !s.trim().is_empty()),
            key_secret: key_secret.filter(|s| !s.trim().is_empty()),
            default_currency: default_currency.into(),
        }
    }

    pub async fn create_order(
        &self,
        caller: &CallerIdentity,
        request: OrderRequest,
    ) -> PaymentResult<Order> {
        let (key_id, key_secret) = match (self.key_id.as_deref(), self.key_secret.as_deref()) {
            (Some(id), Some(secret)) => (id, secret),
            _ => {
                return Err(PaymentError::configuration(
                    "Payment provider key id and key secret must both be configured",
                ))
            }
        };
        let credentials = ProviderCredentials {
            key_id,
            key_secret,
        };

        let order = self.prepare(caller, request)?;

        info!(
            "Creating {} order: {} {} receipt={} plan={} user={}",
            self.provider.name(),
            order.amount,
            order.currency,
            order.receipt,
            order.notes.plan_id,
            caller.user_id
        );

        let created = self
            .provider
            .create_order(credentials, order)
            .await
            .map_err(|e| {
                error!("{} order creation failed: {}", self.provider.name(), e);
                e
            })?;

        info!("Order created: id={}, receipt={}", created.id, created.receipt);
        Ok(created)
    }

    /// Validate the request and build the provider payload.
    fn prepare(&self, caller: &CallerIdentity, request: OrderRequest) -> PaymentResult<NewProviderOrder> {
        let amount = match request.amount {
            Some(amount) if amount > 0 => amount as u64,
            Some(amount) => {
                return Err(PaymentError::validation(format!(
                    "amount must be a positive integer in minor currency units, got {}",
                    amount
                )))
            }
            None => return Err(PaymentError::validation("Missing required field: amount")),
        };
        let plan_id = non_blank(request.plan_id, "planId")?;
        let plan_name = non_blank(request.plan_name, "planName")?;

        let currency = match request.currency {
            Some(c) if !c.trim().is_empty() => normalize_currency(&c)?,
            _ => self.default_currency.clone(),
        };

        Ok(NewProviderOrder {
            amount,
            currency,
            receipt: generate_receipt(),
            notes: OrderNotes {
                plan_id,
                plan_name,
                user_id: caller.user_id.clone(),
            },
        })
    }
}

fn non_blank(value: Option<String>, field: &str) -> PaymentResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(PaymentError::validation(format!("Missing required field: {}", field))),
    }
}

fn normalize_currency(currency: &str) -> PaymentResult<String> {
    let code = currency.trim().to_ascii_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(code)
    } else {
        Err(PaymentError::validation(format!(
            "currency must be a three-letter ISO 4217 code, got {}",
            currency
        )))
    }
}

/// Best-effort unique receipt: millisecond timestamp plus a random suffix.
/// Not a dedup key. Stays under the provider's 40 character limit.
pub fn generate_receipt() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("receipt_{}_{}", Utc::now().timestamp_millis(), &suffix[..8])
}
