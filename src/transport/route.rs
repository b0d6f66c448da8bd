//! Service routes and the credential each one requires.

use reqwest::Method;

use crate::catalog::Platform;

/// Which credential a route is authorized with.
///
/// The transport attaches headers from this tag alone; paths are never
/// inspected to decide what to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Account management: `Authorization: Bearer <token>`.
    Session,
    /// Usage: `X-API-Key: <key>`.
    ApiKey,
}

/// An endpoint of the download service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Register,
    Login,
    ListApiKeys,
    GenerateApiKey,
    /// Deactivate the key with this id.
    DeactivateApiKey(String),
    /// Platform-scoped download.
    Download(Platform),
    Stats,
}

impl Route {
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::Register | Self::Login | Self::GenerateApiKey | Self::Download(_) => {
                Method::POST
            }
            Self::ListApiKeys | Self::Stats => Method::GET,
            Self::DeactivateApiKey(_) => Method::PUT,
        }
    }

    /// Path relative to the service base URL.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Register => "/auth/register".to_string(),
            Self::Login => "/auth/login".to_string(),
            Self::ListApiKeys => "/api/keys".to_string(),
            Self::GenerateApiKey => "/api/keys/generate".to_string(),
            Self::DeactivateApiKey(id) => {
                format!("/api/keys/{}/deactivate", urlencoding::encode(id))
            }
            Self::Download(platform) => format!("/api/download/{platform}"),
            Self::Stats => "/api/stats".to_string(),
        }
    }

    #[must_use]
    pub fn access(&self) -> RouteAccess {
        match self {
            Self::Register
            | Self::Login
            | Self::ListApiKeys
            | Self::GenerateApiKey
            | Self::DeactivateApiKey(_) => RouteAccess::Session,
            Self::Download(_) | Self::Stats => RouteAccess::ApiKey,
        }
    }
}
