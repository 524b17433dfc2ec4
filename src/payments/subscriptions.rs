//! In-memory subscription store
//!
//! Holds the orders issued to each caller until their payment is verified,
//! and the plan each user has paid for.

use crate::error::PaymentResult;
use crate::payments::traits::SubscriptionStore;
use crate::payments::types::{PendingOrder, SubscriptionRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Default)]
struct Inner {
    /// Issued orders by order id
    pending_orders: HashMap<String, PendingOrder>,
    /// Latest record per user
    by_user: HashMap<String, SubscriptionRecord>,
    /// payment id -> user id, to make recording idempotent
    seen_payments: HashMap<String, String>,
}

/// Process-local subscription store
///
/// Keeps the latest verified plan per user. Contents are lost on restart.
#[derive(Default)]
pub struct InMemorySubscriptionStore {
    inner: RwLock<Inner>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn record_pending_order(&self, order: PendingOrder) -> PaymentResult<()> {
        debug!(
            "Storing pending order: order_id={}, user={}, plan={}",
            order.order_id, order.user_id, order.plan_id
        );
        self.inner
            .write()
            .await
            .pending_orders
            .insert(order.order_id.clone(), order);
        Ok(())
    }

    async fn pending_order(&self, order_id: &str) -> PaymentResult<Option<PendingOrder>> {
        Ok(self.inner.read().await.pending_orders.get(order_id).cloned())
    }

    async fn record(&self, record: SubscriptionRecord) -> PaymentResult<bool> {
        let mut inner = self.inner.write().await;

        if inner.seen_payments.contains_key(&record.payment_id) {
            debug!("Payment {} already recorded, skipping", record.payment_id);
            return Ok(false);
        }

        info!(
            "Recording subscription: user={}, plan={}, payment_id={}, source={:?}",
            record.user_id, record.plan_id, record.payment_id, record.source
        );
        inner
            .seen_payments
            .insert(record.payment_id.clone(), record.user_id.clone());

        // Webhooks can arrive after a newer checkout callback
        let is_newer = inner
            .by_user
            .get(&record.user_id)
            .map_or(true, |current| record.activated_at >= current.activated_at);
        if is_newer {
            inner.by_user.insert(record.user_id.clone(), record);
        } else {
            debug!(
                "Payment {} predates the current subscription of user {}, keeping current",
                record.payment_id, record.user_id
            );
        }
        Ok(true)
    }

    async fn current_for(&self, user_id: &str) -> PaymentResult<Option<SubscriptionRecord>> {
        Ok(self.inner.read().await.by_user.get(user_id).cloned())
    }
}
