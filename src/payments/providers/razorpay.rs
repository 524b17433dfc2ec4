//! Razorpay payment provider implementation
//!
//! Creates orders through Razorpay's Orders API. Requests authenticate with
//! HTTP Basic auth using the key id and key secret.

use crate::error::{PaymentError, PaymentResult};
use crate::payments::traits::OrderProvider;
use crate::payments::types::{NewProviderOrder, Order, ProviderCredentials};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};

const PROVIDER: &str = "Razorpay";

/// Razorpay client configuration
#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    /// Razorpay API base URL (defaults to https://api.razorpay.com)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RazorpayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.razorpay.com".to_string(),
            timeout_secs: 30,
        }
    }
}

impl From<&crate::config::PaymentConfig> for RazorpayConfig {
    fn from(config: &crate::config::PaymentConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// Razorpay payment provider
pub struct RazorpayProvider {
    config: RazorpayConfig,
    client: Client,
}

impl RazorpayProvider {
    /// Create a new Razorpay provider instance
    pub fn new(config: RazorpayConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                PaymentError::configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// POST a JSON body to the Razorpay API and decode the response.
    ///
    /// No retries: failures are returned with a retryable hint for the caller.
    async fn post_json<B, T>(
        &self,
        credentials: ProviderCredentials<'_>,
        endpoint: &str,
        body: &B,
    ) -> PaymentResult<T>
    where
        B: serde::Serialize + ?Sized,
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.config.base_url, endpoint);
        let response = self
            .client
            .post(&url)
            .basic_auth(credentials.key_id, Some(credentials.key_secret))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("Razorpay request error: {}", e);
                PaymentError::from(e)
            })?;

        let status = response.status();
        let response_text = response.text().await.unwrap_or_default();

        if status.is_success() {
            return serde_json::from_str::<T>(&response_text).map_err(|e| {
                error!("Failed to parse Razorpay response: {}", e);
                PaymentError::upstream(PROVIDER, format!("Invalid response format: {}", e), false)
            });
        }

        let detail = serde_json::from_str::<RazorpayErrorResponse>(&response_text)
            .map(|e| format!("{}: {}", e.error.code, e.error.description))
            .unwrap_or(response_text);
        let error_msg = format!("HTTP {}: {}", status, detail);
        error!("Razorpay API error: {}", error_msg);

        let is_retryable = status.is_server_error() || status.as_u16() == 429;
        Err(PaymentError::upstream(PROVIDER, error_msg, is_retryable))
    }
}

#[async_trait]
impl OrderProvider for RazorpayProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn create_order(
        &self,
        credentials: ProviderCredentials<'_>,
        order: NewProviderOrder,
    ) -> PaymentResult<Order> {
        let response: RazorpayOrderResponse = self.post_json(credentials, "/v1/orders", &order).await?;

        info!(
            "Razorpay order created: id={}, status={}",
            response.id, response.status
        );

        Ok(Order {
            id: response.id,
            amount: response.amount,
            currency: response.currency,
            receipt: response.receipt.unwrap_or(order.receipt),
        })
    }
}

// Orders API response
#[derive(Debug, Deserialize)]
struct RazorpayOrderResponse {
    id: String,
    amount: u64,
    currency: String,
    #[serde(default)]
    receipt: Option<String>,
    status: String,
}

// Razorpay error envelope
#[derive(Debug, Deserialize)]
struct RazorpayErrorResponse {
    error: RazorpayErrorBody,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorBody {
    code: String,
    description: String,
}
