//! Failure classification at the agent runtime boundary.
//!
//! Pure mapping: no I/O and no retries. Each failure is classified once,
//! where the runtime call (or the pull of the next event) fails.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use super::types::{ErrorSource, LlmError, RawFailure};
use crate::agent::AgentError;

/// A caught failure handed to the classifier.
#[derive(Debug, Clone)]
pub enum Failure {
    /// A proper error value.
    Error(ErrorSource),
    /// Anything that is not an error value; wrapped as-is.
    Raw(String),
}

impl Failure {
    pub fn error<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Error(Arc::new(err))
    }

    pub fn raw(raw: impl Into<String>) -> Self {
        Self::Raw(raw.into())
    }
}

impl From<AgentError> for Failure {
    fn from(err: AgentError) -> Self {
        Self::error(err)
    }
}

/// Optional request diagnostics accompanying a failure.
#[derive(Debug, Clone, Default)]
pub struct FailureContext {
    pub status: Option<u16>,
    pub url: Option<String>,
    pub request_body: Option<String>,
    pub retry_after: Option<Duration>,
}

impl FailureContext {
    pub fn with_status(status: u16) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn request_body(mut self, body: impl Into<String>) -> Self {
        self.request_body = Some(body.into());
        self
    }

    pub fn retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = Some(retry_after);
        self
    }
}

/// Classify a failure into a typed `LlmError`.
///
/// Status dispatch: 401 auth, 404 model not found, 429 rate limit, 400
/// invalid request, >= 500 server error; anything else (including no status)
/// is a generic provider error. Raw, non-error input is always a provider
/// error.
pub fn classify_failure(failure: Failure, context: FailureContext) -> LlmError {
    let source = match failure {
        Failure::Error(source) => source,
        Failure::Raw(raw) => {
            tracing::debug!(raw = %raw, "classifying non-error failure");
            return LlmError::ProviderError {
                status: context.status,
                message: raw.clone(),
                source: Arc::new(RawFailure(raw)),
            };
        }
    };

    let message = source.to_string();
    tracing::debug!(status = ?context.status, %message, "classifying agent failure");

    match context.status {
        Some(401) => LlmError::AuthenticationError { message, source },
        Some(404) => LlmError::ModelNotFound { message, source },
        Some(429) => LlmError::RateLimitError {
            message,
            retry_after: context.retry_after,
            source,
        },
        Some(400) => LlmError::InvalidRequest { message, source },
        Some(status) if status >= 500 => LlmError::ServerError {
            status,
            message,
            url: context.url,
            request_body: context.request_body,
            source,
        },
        status => LlmError::ProviderError {
            status,
            message,
            source,
        },
    }
}

/// Classify an error raised by an `AgentRuntime`, lifting any status and
/// request diagnostics the runtime attached.
pub fn classify_agent_error(err: AgentError) -> LlmError {
    let context = match &err {
        AgentError::Api {
            status,
            retry_after,
            url,
            request_body,
            ..
        } => FailureContext {
            status: *status,
            url: url.clone(),
            request_body: request_body.clone(),
            retry_after: retry_after.map(Duration::from_secs),
        },
        _ => FailureContext::default(),
    };
    classify_failure(Failure::from(err), context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    fn api_failure(status: u16) -> AgentError {
        AgentError::Api {
            status: Some(status),
            message: format!("upstream said {status}"),
            retry_after: None,
            url: None,
            request_body: None,
        }
    }

    #[test]
    fn status_table_maps_to_categories() {
        let cases = [
            (401, ErrorCategory::Authentication),
            (404, ErrorCategory::NotFound),
            (429, ErrorCategory::RateLimit),
            (400, ErrorCategory::Client),
            (500, ErrorCategory::Server),
            (403, ErrorCategory::Provider),
        ];
        for (status, expected) in cases {
            let err = classify_failure(
                Failure::from(api_failure(status)),
                FailureContext::with_status(status),
            );
            assert_eq!(err.category(), expected, "status {status}");
            let cause = err
                .cause()
                .downcast_ref::<AgentError>()
                .expect("original error kept as cause");
            assert!(matches!(cause, AgentError::Api { status: Some(s), .. } if *s == status));
        }
    }

    #[test]
    fn missing_status_is_generic() {
        let err = classify_failure(
            Failure::error(std::io::Error::other("pipe closed")),
            FailureContext::default(),
        );
        assert!(matches!(err, LlmError::ProviderError { status: None, .. }));
        assert_eq!(err.message(), "pipe closed");
    }

    #[test]
    fn raw_input_wraps_as_provider_error_even_with_status() {
        let err = classify_failure(Failure::raw("not an error"), FailureContext::with_status(401));
        match &err {
            LlmError::ProviderError {
                status, message, ..
            } => {
                assert_eq!(*status, Some(401));
                assert_eq!(message, "not an error");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
        let raw = err.cause().downcast_ref::<RawFailure>().expect("raw cause");
        assert_eq!(raw.0, "not an error");
    }

    #[test]
    fn server_error_carries_request_context() {
        let err = classify_failure(
            Failure::from(api_failure(502)),
            FailureContext::with_status(502)
                .url("https://api.example.com/v1/messages")
                .request_body(r#"{"model":"sonnet"}"#),
        );
        match err {
            LlmError::ServerError {
                status,
                url,
                request_body,
                ..
            } => {
                assert_eq!(status, 502);
                assert_eq!(url.as_deref(), Some("https://api.example.com/v1/messages"));
                assert_eq!(request_body.as_deref(), Some(r#"{"model":"sonnet"}"#));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn agent_error_lifts_retry_after() {
        let err = classify_agent_error(AgentError::Api {
            status: Some(429),
            message: "slow down".into(),
            retry_after: Some(30),
            url: None,
            request_body: None,
        });
        assert_eq!(err.retry_after(), Some(Duration::from_secs(30)));
        assert!(err.is_retryable());
    }

    #[test]
    fn agent_error_without_status_is_generic() {
        let err = classify_agent_error(AgentError::Exit {
            code: Some(1),
            stderr: "crashed".into(),
        });
        assert_eq!(err.category(), ErrorCategory::Provider);
        assert!(matches!(
            err.cause().downcast_ref::<AgentError>(),
            Some(AgentError::Exit { .. })
        ));
    }
}
