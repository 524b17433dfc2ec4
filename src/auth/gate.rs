//! Route gate middleware.
//!
//! Paths matching a public pattern pass through. Everything else needs a
//! resolved caller: API paths answer 401, page paths redirect to sign-in.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use regex::RegexSet;
use tracing::debug;

use super::IdentityResolver;
use crate::api::error::ApiError;
use crate::error::PaymentError;

pub const DEFAULT_PUBLIC_ROUTES: &[&str] = &[
    "/",
    "/pricing",
    "/about",
    "/contact",
    "/sign-in(.*)",
    "/sign-up(.*)",
    "/health",
    "/api/webhooks(.*)",
];

/// Static public/protected path classifier
#[derive(Debug, Clone)]
pub struct RouteGate {
    public: RegexSet,
}

impl RouteGate {
    /// Compile route patterns. `(.*)` matches any suffix; everything else is literal.
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let compiled: Vec<String> = patterns
            .into_iter()
            .map(|p| pattern_to_regex(p.as_ref()))
            .collect();
        Ok(Self {
            public: RegexSet::new(compiled)?,
        })
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public.is_match(path)
    }
}

fn pattern_to_regex(pattern: &str) -> String {
    let escaped: Vec<String> = pattern.split("(.*)").map(regex::escape).collect();
    format!("^{}$", escaped.join("(.*)"))
}

/// State for [`route_gate`]
#[derive(Clone)]
pub struct GateState {
    pub gate: Arc<RouteGate>,
    pub resolver: Arc<dyn IdentityResolver>,
    pub sign_in_url: String,
}

impl GateState {
    fn sign_in_redirect(&self, path: &str) -> Redirect {
        let separator = if self.sign_in_url.contains('?') { '&' } else { '?' };
        Redirect::temporary(&format!(
            "{}{}redirect_url={}",
            self.sign_in_url,
            separator,
            urlencoding::encode(path)
        ))
    }
}

pub async fn route_gate(State(state): State<GateState>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let identity = state.resolver.resolve(request.headers()).await;

    if let Some(identity) = identity {
        request.extensions_mut().insert(identity);
        return next.run(request).await;
    }

    if state.gate.is_public(&path) {
        return next.run(request).await;
    }

    debug!("Blocking unauthenticated request to {}", path);
    if is_api_path(&path) {
        ApiError::from(PaymentError::Unauthenticated).into_response()
    } else {
        state.sign_in_redirect(&path).into_response()
    }
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}
