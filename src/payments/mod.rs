//! Payment integration module
//!
//! Order issuance, checkout signature verification, webhook verification and
//! subscription recording, behind provider-agnostic traits.

pub mod issuer;
pub mod providers;
pub mod signature;
pub mod subscriptions;
pub mod traits;
pub mod types;
pub mod verifier;
pub mod webhook;

pub use issuer::OrderIssuer;
pub use subscriptions::InMemorySubscriptionStore;
pub use traits::{OrderProvider, SubscriptionStore};
pub use verifier::PaymentVerifier;
pub use webhook::WebhookVerifier;
