use thiserror::Error;

pub type PaymentResult<T> = Result<T, PaymentError>;

/// Failure taxonomy shared by order issuance, verification and the HTTP layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// Missing or malformed caller input
    #[error("Invalid request: {message}")]
    Validation { message: String },

    /// A required secret or setting is absent
    #[error("Payment configuration error: {message}")]
    Configuration { message: String },

    /// The payment provider call failed
    #[error("{provider} request failed: {message}")]
    Upstream {
        provider: String,
        message: String,
        is_retryable: bool,
    },

    #[error("Payment signature verification failed")]
    VerificationFailed,

    #[error("Caller identity is required")]
    Unauthenticated,

    #[error("Subscription storage error: {message}")]
    Storage { message: String },
}

impl PaymentError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn upstream(provider: impl Into<String>, message: impl Into<String>, is_retryable: bool) -> Self {
        Self::Upstream {
            provider: provider.into(),
            message: message.into(),
            is_retryable,
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Operator or third-party faults, as opposed to rejections of the caller's input.
    pub fn is_server_fault(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::Upstream { .. } | Self::Storage { .. }
        )
    }

    /// Hint for callers deciding whether to retry; nothing in this crate retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Upstream {
                is_retryable: true,
                ..
            }
        )
    }

    /// Stable machine-readable code used in error response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::VerificationFailed => "VERIFICATION_FAILED",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Storage { .. } => "STORAGE_ERROR",
        }
    }
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        // Transport failures never reached Razorpay; decode and status errors did
        let retryable = err.is_timeout() || err.is_connect() || err.is_request();
        PaymentError::upstream("Razorpay", format!("Request error: {}", err), retryable)
    }
}
