use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;

use crate::auth::gate::DEFAULT_PUBLIC_ROUTES;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub payments: PaymentConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
}

/// Razorpay credentials and client settings.
///
/// Secrets are optional here: a missing secret does not stop the server from
/// starting, it fails each payment operation that needs it.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    pub key_id: Option<String>,
    pub key_secret: Option<String>,
    /// Secret used for checkout signatures. Razorpay signs with the key secret,
    /// so this falls back to `key_secret` when unset.
    pub signing_secret: Option<String>,
    pub webhook_secret: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub default_currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub sign_in_url: String,
    pub public_routes: Vec<String>,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            key_id: None,
            key_secret: None,
            signing_secret: None,
            webhook_secret: None,
            base_url: "https://api.razorpay.com".to_string(),
            timeout_secs: 30,
            default_currency: "INR".to_string(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            sign_in_url: "/sign-in".to_string(),
            public_routes: DEFAULT_PUBLIC_ROUTES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PaymentConfig {
    pub fn from_env() -> Result<Self> {
        let key_secret = non_empty_var("RAZORPAY_KEY_SECRET");
        let signing_secret = non_empty_var("RAZORPAY_SIGNING_SECRET").or_else(|| key_secret.clone());

        Ok(Self {
            key_id: non_empty_var("RAZORPAY_KEY_ID"),
            key_secret,
            signing_secret,
            webhook_secret: non_empty_var("RAZORPAY_WEBHOOK_SECRET"),
            base_url: env::var("RAZORPAY_BASE_URL")
                .unwrap_or_else(|_| "https://api.razorpay.com".to_string()),
            timeout_secs: env::var("RAZORPAY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("RAZORPAY_TIMEOUT_SECS must be a valid number")?,
            default_currency: env::var("DEFAULT_CURRENCY")
                .unwrap_or_else(|_| "INR".to_string())
                .to_uppercase(),
        })
    }

    /// Whether every secret needed for checkout is present.
    pub fn is_configured(&self) -> bool {
        self.key_id.is_some() && self.key_secret.is_some() && self.signing_secret.is_some()
    }
}

impl AuthConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let public_routes = match env::var("AUTH_PUBLIC_ROUTES") {
            Ok(routes) => routes
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => defaults.public_routes,
        };

        Self {
            sign_in_url: env::var("AUTH_SIGN_IN_URL").unwrap_or(defaults.sign_in_url),
            public_routes,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let server = ServerConfig {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        };

        let config = Config {
            server,
            payments: PaymentConfig::from_env()?,
            auth: AuthConfig::from_env(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port < 1024 {
            return Err(anyhow!(
                "Port must be at least 1024, got {}",
                self.server.port
            ));
        }

        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&self.server.environment.as_str()) {
            return Err(anyhow!(
                "Environment must be one of: {:?}, got {}",
                valid_environments,
                self.server.environment
            ));
        }

        if self.payments.base_url.trim().is_empty() {
            return Err(anyhow!("RAZORPAY_BASE_URL cannot be empty"));
        }

        if self.payments.timeout_secs == 0 {
            return Err(anyhow!("RAZORPAY_TIMEOUT_SECS must be greater than 0"));
        }

        let currency = &self.payments.default_currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(anyhow!(
                "DEFAULT_CURRENCY must be a three-letter ISO 4217 code, got {}",
                currency
            ));
        }

        if self.auth.sign_in_url.trim().is_empty() {
            return Err(anyhow!("AUTH_SIGN_IN_URL cannot be empty"));
        }

        Ok(())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
