//! Caller identity and route gating.
//!
//! Sessions belong to the hosted identity provider. This module only reads the
//! identity the provider's edge has already established and decides which
//! paths need one.

pub mod gate;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::error::PaymentError;

pub use gate::{route_gate, GateState, RouteGate};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Authenticated caller as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallerIdentity {
    pub user_id: String,
    pub email: Option<String>,
}

impl CallerIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Resolves who is calling from request headers
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, headers: &HeaderMap) -> Option<CallerIdentity>;
}

/// Reads the identity headers set by the identity provider's edge proxy.
///
/// Only safe behind a proxy that strips these headers from client traffic.
#[derive(Debug, Default, Clone)]
pub struct HeaderIdentityResolver;

#[async_trait]
impl IdentityResolver for HeaderIdentityResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Option<CallerIdentity> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let user_id = header(USER_ID_HEADER)?;
        Some(CallerIdentity {
            user_id,
            email: header(USER_EMAIL_HEADER),
        })
    }
}

/// Extractor for handlers that need the caller.
///
/// The route gate places the identity in request extensions; its absence
/// rejects with 401.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub CallerIdentity);

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .map(RequireAuth)
            .ok_or_else(|| ApiError::from(PaymentError::Unauthenticated))
    }
}
