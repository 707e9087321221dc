// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system.
//! Each variant says what went wrong and where, and the classification
//! methods decide whether a failure is retried, degraded, or surfaced.

use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// HTTP failure statuses as a typed vocabulary.
///
/// Retry and fallback decisions match on these variants instead of
/// comparing raw status numbers at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpFailure {
    /// 400: the request was rejected as malformed
    BadRequest,
    /// 401: credentials missing or invalid
    Unauthorized,
    /// 403: credentials valid but lacking permission
    Forbidden,
    /// 404: the endpoint or resource does not exist
    NotFound,
    /// 429: the server is throttling us
    TooManyRequests,
    /// Any 5xx status
    ServerError(u16),
    /// Any other non-success status
    ClientError(u16),
}

impl HttpFailure {
    /// Classify a non-success HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            429 => Self::TooManyRequests,
            500..=599 => Self::ServerError(status),
            other => Self::ClientError(other),
        }
    }

    /// Whether this failure is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TooManyRequests | Self::ServerError(_))
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::TooManyRequests => 429,
            Self::ServerError(code) | Self::ClientError(code) => *code,
        }
    }
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest => write!(f, "bad_request"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::NotFound => write!(f, "not_found"),
            Self::TooManyRequests => write!(f, "too_many_requests"),
            Self::ServerError(code) => write!(f, "server_error_{}", code),
            Self::ClientError(code) => write!(f, "http_{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error(transparent)]
    InvalidCriteria(#[from] crate::types::ValidationError),

    #[error("Rate limit exceeded for {operation}: at most {limit} calls per {interval:?}")]
    RateLimitExceeded {
        operation: String,
        limit: usize,
        interval: Duration,
    },

    #[error("Network failure: {message}")]
    Transport { message: String },

    #[error("Timed out during {operation}")]
    Timeout { operation: String },

    #[error("Catalog API returned {code} (HTTP {status}) for {endpoint}: {message}")]
    Http {
        code: HttpFailure,
        status: u16,
        endpoint: String,
        message: String,
    },

    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AppError {
    /// Builds an HTTP error from a non-success status and its response body.
    pub fn http(status: u16, endpoint: impl Into<String>, body: &str) -> Self {
        AppError::Http {
            code: HttpFailure::from_status(status),
            status,
            endpoint: endpoint.into(),
            message: preview(body),
        }
    }

    pub fn malformed(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::MalformedResponse {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Whether another attempt of the same call could succeed.
    ///
    /// Timeouts, transport failures, 5xx and 429 are transient. Every other
    /// failure, including a local rate-limit rejection, is final.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => true,
            Self::Http { code, .. } => code.is_retryable(),
            _ => false,
        }
    }

    /// Whether the server rejected our credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Http {
                code: HttpFailure::Unauthorized,
                ..
            }
        )
    }

    /// Whether a failed specialized fetch should degrade to the bounded
    /// generic listing instead of propagating.
    pub fn degrades_to_fallback(&self) -> bool {
        self.is_retryable()
    }
}

fn preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let head: String = trimmed.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", head)
    } else {
        trimmed.to_string()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout {
                operation: err
                    .url()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "HTTP request".to_string()),
            }
        } else {
            AppError::Transport {
                message: err.to_string(),
            }
        }
    }
}

// Allow converting from anyhow::Error, preserving error chain
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError {
            message: err.to_string(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse {
            endpoint: "<unknown>".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
