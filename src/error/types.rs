//! Core error types.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Shared, cloneable handle to the original failure behind an `LlmError`.
pub type ErrorSource = Arc<dyn StdError + Send + Sync + 'static>;

/// Typed error returned by the provider.
///
/// Every variant keeps the original failure as its source, so the underlying
/// diagnostic stays reachable through [`LlmError::cause`] or
/// `std::error::Error::source`.
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// The agent runtime rejected the credentials (HTTP 401).
    #[error("Authentication error: {message}")]
    AuthenticationError {
        message: String,
        #[source]
        source: ErrorSource,
    },

    /// Too many requests (HTTP 429).
    #[error("Rate limit exceeded: {message}")]
    RateLimitError {
        message: String,
        /// Hint from the runtime on when to try again.
        retry_after: Option<Duration>,
        #[source]
        source: ErrorSource,
    },

    /// The requested model does not exist (HTTP 404).
    #[error("Model not found: {message}")]
    ModelNotFound {
        message: String,
        #[source]
        source: ErrorSource,
    },

    /// The request was malformed (HTTP 400).
    #[error("Invalid request: {message}")]
    InvalidRequest {
        message: String,
        #[source]
        source: ErrorSource,
    },

    /// The upstream service failed (HTTP 5xx).
    #[error("Server error ({status}): {message}")]
    ServerError {
        status: u16,
        message: String,
        /// Request URL, when the runtime reported one.
        url: Option<String>,
        /// Request body, when the runtime reported one.
        request_body: Option<String>,
        #[source]
        source: ErrorSource,
    },

    /// Catch-all for anything that is not one of the categories above.
    #[error("Provider error: {message}")]
    ProviderError {
        status: Option<u16>,
        message: String,
        #[source]
        source: ErrorSource,
    },
}

/// Coarse error category, convenient for `match`ing in callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    NotFound,
    Client,
    Server,
    Provider,
}

/// Wrapper used when the failure handed to the classifier is not an error
/// value at all (for example a bare message from the runtime).
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct RawFailure(pub String);

impl LlmError {
    /// Category of this error.
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::AuthenticationError { .. } => ErrorCategory::Authentication,
            Self::RateLimitError { .. } => ErrorCategory::RateLimit,
            Self::ModelNotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidRequest { .. } => ErrorCategory::Client,
            Self::ServerError { .. } => ErrorCategory::Server,
            Self::ProviderError { .. } => ErrorCategory::Provider,
        }
    }

    /// HTTP-like status code associated with the error, if known.
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::AuthenticationError { .. } => Some(401),
            Self::RateLimitError { .. } => Some(429),
            Self::ModelNotFound { .. } => Some(404),
            Self::InvalidRequest { .. } => Some(400),
            Self::ServerError { status, .. } => Some(*status),
            Self::ProviderError { status, .. } => *status,
        }
    }

    /// Retry-after hint carried by rate-limit errors.
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimitError { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Whether the caller may reasonably retry. The provider itself never does.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimitError { .. } | Self::ServerError { .. }
        )
    }

    /// Human readable message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::AuthenticationError { message, .. }
            | Self::RateLimitError { message, .. }
            | Self::ModelNotFound { message, .. }
            | Self::InvalidRequest { message, .. }
            | Self::ServerError { message, .. }
            | Self::ProviderError { message, .. } => message,
        }
    }

    /// The original failure this error was classified from.
    ///
    /// Use `downcast_ref` to inspect it, e.g.
    /// `err.cause().downcast_ref::<AgentError>()`.
    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        match self {
            Self::AuthenticationError { source, .. }
            | Self::RateLimitError { source, .. }
            | Self::ModelNotFound { source, .. }
            | Self::InvalidRequest { source, .. }
            | Self::ServerError { source, .. }
            | Self::ProviderError { source, .. } => source.as_ref(),
        }
    }
}
