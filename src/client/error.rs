//! Error types for client operations.

use std::fmt;

use thiserror::Error;

use super::config::ConfigError;
use crate::catalog::{HTTP_TOO_MANY_REQUESTS, Platform, messages};
use crate::transport::TransportError;

/// Service operation a remote failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Register,
    Login,
    GenerateApiKey,
    ListApiKeys,
    DeactivateApiKey,
    Download,
    Stats,
}

impl Operation {
    /// Message used when the service gives no explanation of its own.
    #[must_use]
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::Register => messages::REGISTRATION_FAILED,
            Self::Login => messages::LOGIN_FAILED,
            Self::GenerateApiKey => messages::GENERATE_API_KEY_FAILED,
            Self::ListApiKeys => messages::LIST_API_KEYS_FAILED,
            Self::DeactivateApiKey => messages::DEACTIVATE_API_KEY_FAILED,
            Self::Download => messages::DOWNLOAD_FAILED,
            Self::Stats => messages::STATS_FAILED,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Register => "register",
            Self::Login => "login",
            Self::GenerateApiKey => "generate_api_key",
            Self::ListApiKeys => "list_api_keys",
            Self::DeactivateApiKey => "deactivate_api_key",
            Self::Download => "download",
            Self::Stats => "stats",
        };
        f.write_str(name)
    }
}

/// Errors returned by [`DownloadClient`](super::DownloadClient) operations.
///
/// Every variant except [`Remote`](Self::Remote),
/// [`Transport`](Self::Transport) and [`InvalidToken`](Self::InvalidToken)
/// is raised before any request is sent.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A session operation was called without logging in.
    #[error("{}", messages::AUTH_REQUIRED)]
    AuthRequired,

    /// A download or stats call was made without an API key.
    #[error("{}", messages::API_KEY_REQUIRED)]
    ApiKeyRequired,

    /// The API key argument was blank or not a valid header value.
    #[error("{}", messages::INVALID_API_KEY)]
    InvalidApiKey,

    /// Login succeeded but the token cannot be sent back as a header.
    #[error("{}", messages::INVALID_TOKEN)]
    InvalidToken,

    #[error("{}: {url}", messages::INVALID_URL)]
    InvalidUrl { url: String },

    #[error("{}: {format}", messages::INVALID_FORMAT)]
    InvalidFormat { format: String },

    /// The URL is valid but no platform pattern recognizes it.
    #[error("{}: {url}", messages::UNSUPPORTED_PLATFORM)]
    UnsupportedPlatform { url: String },

    /// A platform-specific shortcut was given another platform's URL.
    #[error("URL must be a {} URL: {url}", .expected.info().name)]
    PlatformMismatch { expected: Platform, url: String },

    /// The service rejected the call, or could not be reached.
    #[error("{message}")]
    Remote {
        operation: Operation,
        /// Service-provided message, or a generic one for the operation.
        message: String,
        #[source]
        source: TransportError,
    },

    /// The transport could not be set up.
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Wraps a transport failure of `operation`, choosing the most useful
    /// message: the service's own, then rate limiting, then connectivity,
    /// then the operation's generic message.
    pub fn remote(operation: Operation, source: TransportError) -> Self {
        let message = match (source.service_message(), source.status_code()) {
            (Some(message), _) => message.to_string(),
            (None, Some(HTTP_TOO_MANY_REQUESTS)) => messages::RATE_LIMIT_EXCEEDED.to_string(),
            (None, _) if source.is_connectivity() => messages::NETWORK_ERROR.to_string(),
            (None, _) => operation.fallback_message().to_string(),
        };
        Self::Remote {
            operation,
            message,
            source,
        }
    }

    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    pub fn invalid_format(format: impl Into<String>) -> Self {
        Self::InvalidFormat {
            format: format.into(),
        }
    }

    pub fn unsupported_platform(url: impl Into<String>) -> Self {
        Self::UnsupportedPlatform { url: url.into() }
    }

    pub fn platform_mismatch(expected: Platform, url: impl Into<String>) -> Self {
        Self::PlatformMismatch {
            expected,
            url: url.into(),
        }
    }

    /// The underlying transport error, if the failure came from the network.
    #[must_use]
    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            Self::Remote { source, .. } | Self::Transport(source) => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_prefers_service_message() {
        let source = TransportError::status("/auth/login", 401, Some("wrong password".into()));
        let error = ClientError::remote(Operation::Login, source);
        assert_eq!(error.to_string(), "wrong password");
    }

    #[test]
    fn test_remote_rate_limit_message() {
        let source = TransportError::status("/api/download/youtube", 429, None);
        let error = ClientError::remote(Operation::Download, source);
        assert_eq!(error.to_string(), messages::RATE_LIMIT_EXCEEDED);
    }

    #[test]
    fn test_remote_connectivity_message() {
        let source = TransportError::Timeout {
            path: "/api/stats".to_string(),
        };
        let error = ClientError::remote(Operation::Stats, source);
        assert_eq!(error.to_string(), messages::NETWORK_ERROR);
    }

    #[test]
    fn test_remote_falls_back_per_operation() {
        let source = TransportError::status("/api/download/youtube", 500, None);
        let error = ClientError::remote(Operation::Download, source);
        assert_eq!(error.to_string(), messages::DOWNLOAD_FAILED);
        assert_eq!(
            error.transport_error().and_then(TransportError::status_code),
            Some(500)
        );
    }

    #[test]
    fn test_precondition_messages() {
        assert_eq!(ClientError::AuthRequired.to_string(), messages::AUTH_REQUIRED);
        assert_eq!(ClientError::ApiKeyRequired.to_string(), messages::API_KEY_REQUIRED);
        assert!(
            ClientError::invalid_format("flac")
                .to_string()
                .contains("flac")
        );
        assert_eq!(
            ClientError::platform_mismatch(Platform::Tiktok, "https://x.com").to_string(),
            "URL must be a TikTok URL: https://x.com"
        );
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::DeactivateApiKey.to_string(), "deactivate_api_key");
    }
}
