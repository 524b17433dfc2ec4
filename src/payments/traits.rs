//! Payment collaborator trait definitions
//!
//! The seams the billing core depends on: the payment provider that issues
//! orders, and the store that remembers which plan a caller paid for.

use crate::error::PaymentResult;
use crate::payments::types::{
    NewProviderOrder, Order, PendingOrder, ProviderCredentials, SubscriptionRecord,
};
use async_trait::async_trait;

/// Trait for payment provider implementations
///
/// Providers only create orders. Signature checks are done locally by the
/// verifier, so they need no provider round-trip.
#[async_trait]
pub trait OrderProvider: Send + Sync {
    /// Short provider name used in logs and upstream errors
    fn name(&self) -> &'static str;

    /// Create an order on the provider side
    ///
    /// # Arguments
    /// * `credentials` - API key pair, checked for presence by the caller
    /// * `order` - Validated amount, currency, receipt and reconciliation notes
    ///
    /// # Returns
    /// * `Order` - Provider-issued order id echoed with amount, currency and receipt
    async fn create_order(
        &self,
        credentials: ProviderCredentials<'_>,
        order: NewProviderOrder,
    ) -> PaymentResult<Order>;
}

/// Persistence for issued orders and verified payments
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Remember which caller and plan an issued order belongs to
    async fn record_pending_order(&self, order: PendingOrder) -> PaymentResult<()>;

    /// Order previously stored by `record_pending_order`
    async fn pending_order(&self, order_id: &str) -> PaymentResult<Option<PendingOrder>>;

    /// Record a verified payment. Recording a payment id that is already
    /// stored returns `false` and changes nothing. A record older than the
    /// user's current one is kept in history but does not replace it.
    async fn record(&self, record: SubscriptionRecord) -> PaymentResult<bool>;

    /// Latest subscription recorded for the user
    async fn current_for(&self, user_id: &str) -> PaymentResult<Option<SubscriptionRecord>>;
}
