//! Error types for the transport layer.

use thiserror::Error;

/// Errors produced while talking to the download service.
///
/// These are surfaced unchanged once retries are exhausted; the client facade
/// keeps them as the `source` of its own errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network-level failure (DNS, connection refused, TLS, broken body).
    #[error("network error calling {path}: {source}")]
    Network {
        /// Route path that failed.
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request did not complete within the configured timeout.
    #[error("timeout calling {path}")]
    Timeout {
        /// Route path that timed out.
        path: String,
    },

    /// The service answered with a non-2xx status.
    #[error("HTTP {status} from {path}{}", message_suffix(.message))]
    Status {
        /// Route path that was rejected.
        path: String,
        status: u16,
        /// Message from the service's JSON error body, when present.
        message: Option<String>,
    },

    /// A 2xx body did not match the expected shape.
    #[error("unexpected response body from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The HTTP client or a request could not be constructed, e.g. a
    /// credential that is not a valid header value. Never retried.
    #[error("failed to build HTTP request: {source}")]
    Build {
        #[source]
        source: reqwest::Error,
    },
}

#[allow(clippy::ref_option)]
fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

impl TransportError {
    /// Classifies a reqwest failure: timeouts become [`Self::Timeout`] and
    /// request construction failures [`Self::Build`].
    pub fn network(path: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { path: path.into() }
        } else if source.is_builder() {
            Self::Build { source }
        } else {
            Self::Network {
                path: path.into(),
                source,
            }
        }
    }

    /// Creates an HTTP status error.
    pub fn status(path: impl Into<String>, status: u16, message: Option<String>) -> Self {
        Self::Status {
            path: path.into(),
            status,
            message,
        }
    }

    /// Creates a body decoding error.
    pub fn decode(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }

    /// Returns the HTTP status when the service answered.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the message the service put in its error body, if any.
    #[must_use]
    pub fn service_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Whether another attempt could succeed. Local construction and decode
    /// failures repeat identically.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Build { .. } | Self::Decode { .. })
    }

    /// Whether the service was never reached (network failure or timeout).
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display_with_message() {
        let error = TransportError::status("/api/stats", 403, Some("key revoked".to_string()));
        let msg = error.to_string();
        assert_eq!(msg, "HTTP 403 from /api/stats: key revoked");
        assert_eq!(error.status_code(), Some(403));
        assert_eq!(error.service_message(), Some("key revoked"));
    }

    #[test]
    fn test_status_error_display_without_message() {
        let error = TransportError::status("/api/keys", 500, None);
        assert_eq!(error.to_string(), "HTTP 500 from /api/keys");
        assert_eq!(error.service_message(), None);
        assert!(!error.is_connectivity());
    }

    #[test]
    fn test_timeout_display() {
        let error = TransportError::Timeout {
            path: "/api/download/youtube".to_string(),
        };
        assert!(error.to_string().contains("timeout"));
        assert!(error.is_connectivity());
        assert_eq!(error.status_code(), None);
    }

    #[test]
    fn test_builder_failure_is_build_and_not_retryable() {
        let source = reqwest::Client::new()
            .get("http://localhost:3000/api/stats")
            .header("X-API-Key", "bad\nkey")
            .build()
            .unwrap_err();
        assert!(source.is_builder());

        let error = TransportError::network("/api/stats", source);
        assert!(matches!(error, TransportError::Build { .. }));
        assert!(!error.is_retryable());
        assert!(!error.is_connectivity());
    }

    #[test]
    fn test_status_and_network_errors_are_retryable() {
        assert!(TransportError::status("/api/stats", 500, None).is_retryable());
        assert!(TransportError::Timeout { path: "/api/stats".into() }.is_retryable());
    }

    #[test]
    fn test_decode_error_display() {
        let source = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let error = TransportError::decode("/auth/login", source);
        assert!(error.to_string().contains("/auth/login"));
    }
}
