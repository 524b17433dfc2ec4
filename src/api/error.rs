//! Maps payment errors onto HTTP responses.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::PaymentError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Handler error type: every failure leaves through here as a structured body.
#[derive(Debug)]
pub struct ApiError(pub PaymentError);

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PaymentError::Validation { .. } | PaymentError::VerificationFailed => {
                StatusCode::BAD_REQUEST
            }
            PaymentError::Unauthenticated => StatusCode::UNAUTHORIZED,
            PaymentError::Configuration { .. }
            | PaymentError::Upstream { .. }
            | PaymentError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();

        if self.0.is_server_fault() {
            error!(code = self.0.code(), "Payment request failed: {}", self.0);
        } else {
            warn!(code = self.0.code(), "Payment request rejected: {}", self.0);
        }

        // Operator-side details stay in the logs
        let message = match &self.0 {
            PaymentError::Configuration { .. } => "Payment service is not configured".to_string(),
            PaymentError::Upstream { .. } => "Payment provider request failed".to_string(),
            PaymentError::Storage { .. } => "Failed to record subscription".to_string(),
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: self.0.code().to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
