//! Client facade over the download service.
//!
//! [`DownloadClient`] validates arguments locally, then delegates to the
//! [`transport`](crate::transport) layer. Preconditions are checked in a
//! fixed order and fail before any request is sent:
//!
//! 1. credential (session token or API key) is present
//! 2. URL is well-formed http(s)
//! 3. format is one of [`Format::ALL`]
//! 4. URL belongs to a supported platform
//!
//! # Example
//!
//! ```no_run
//! use media_download_client::{DownloadClient, Format};
//!
//! # async fn example() -> Result<(), media_download_client::ClientError> {
//! let client = DownloadClient::new("http://localhost:3000")?;
//! client.set_api_key("my-key")?;
//! let result = client
//!     .download("https://www.youtube.com/watch?v=dQw4w9WgXcQ", Format::Mp3)
//!     .await?;
//! println!("{:?}", result.formatted_size);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod models;

use std::fmt;
use std::time::Duration;

use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

pub use config::{
    ClientConfig, ConfigError, ENV_BASE_URL, ENV_BATCH_DELAY_MS, ENV_RETRIES,
    ENV_RETRY_DELAY_MS, ENV_TIMEOUT_MS, MAX_RETRIES,
};
pub use error::{ClientError, Operation};
pub use models::{
    ApiKeyRecord, ClientInfo, DownloadResult, Identifier, LoginResult, RegistrationResult,
    ServiceMessage, UsageStats,
};

use crate::catalog::{Format, HTTP_UNAUTHORIZED, PING_TIMEOUT_MS, Platform};
use crate::classifier::{classify_platform, is_valid_url};
use crate::transport::{ApiRequest, CredentialStore, HttpTransport, Route};
use models::ApiKeyList;

/// Client for one service instance holding one session token and one API key.
///
/// Credentials are per instance and can be set from any task; requests read
/// them at send time.
#[derive(Debug)]
pub struct DownloadClient {
    transport: HttpTransport,
    config: ClientConfig,
}

impl DownloadClient {
    /// Creates a client for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when `base_url` is not an http(s) URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_config(ClientConfig::with_base_url(base_url))
    }

    /// Creates a client from a full configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] for invalid settings and
    /// [`ClientError::Transport`] if the HTTP client cannot be built.
    pub fn with_config(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let transport = HttpTransport::new(
            config.base_url.clone(),
            config.timeout(),
            config.retry_policy(),
            CredentialStore::new(),
        )?;
        debug!(base_url = %transport.base_url(), "client created");
        Ok(Self { transport, config })
    }

    /// Creates a client configured from `MEDIA_DL_*` environment variables.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`] and [`DownloadClient::with_config`].
    pub fn from_env() -> Result<Self, ClientError> {
        Self::with_config(ClientConfig::from_env()?)
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ==================== Account ====================

    /// Creates an account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Remote`] when the service rejects the request.
    #[instrument(skip(self, email, password))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<RegistrationResult, ClientError> {
        let request = ApiRequest::with_body(
            Route::Register,
            json!({"username": username, "email": email, "password": password}),
        );
        let mut result: RegistrationResult = self.call(Operation::Register, &request).await?;
        result.success = true;
        info!("account registered");
        Ok(result)
    }

    /// Logs in and keeps the returned token for session routes.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Remote`] on bad credentials or service failure
    /// and [`ClientError::InvalidToken`] when the returned token cannot be
    /// sent as a header; the held token is left untouched in both cases.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResult, ClientError> {
        let request = ApiRequest::with_body(
            Route::Login,
            json!({"username": username, "password": password}),
        );
        let mut result: LoginResult = self.call(Operation::Login, &request).await?;
        if !is_header_safe(&result.token) {
            warn!("login returned a token that is not a valid header value");
            return Err(ClientError::InvalidToken);
        }
        self.transport.credentials().set_token(result.token.clone());
        result.success = true;
        info!("logged in");
        Ok(result)
    }

    /// Forgets both the session token and the API key. Purely local.
    pub fn logout(&self) {
        self.transport.credentials().clear();
        debug!("credentials cleared");
    }

    // ==================== API keys ====================

    /// Creates a new API key named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AuthRequired`] without a session token, or
    /// [`ClientError::Remote`] on service failure.
    #[instrument(skip(self))]
    pub async fn generate_api_key(&self, name: &str) -> Result<ApiKeyRecord, ClientError> {
        self.require_token()?;
        let request = ApiRequest::with_body(Route::GenerateApiKey, json!({"keyName": name}));
        self.call(Operation::GenerateApiKey, &request).await
    }

    /// Lists the account's API keys.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AuthRequired`] without a session token, or
    /// [`ClientError::Remote`] on service failure.
    #[instrument(skip(self))]
    pub async fn list_api_keys(&self) -> Result<Vec<ApiKeyRecord>, ClientError> {
        self.require_token()?;
        let list: ApiKeyList = self
            .call(Operation::ListApiKeys, &ApiRequest::new(Route::ListApiKeys))
            .await?;
        Ok(list.into_records())
    }

    /// Deactivates the API key with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AuthRequired`] without a session token, or
    /// [`ClientError::Remote`] on service failure.
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn deactivate_api_key(
        &self,
        id: impl fmt::Display,
    ) -> Result<ServiceMessage, ClientError> {
        self.require_token()?;
        let request = ApiRequest::new(Route::DeactivateApiKey(id.to_string()));
        self.call(Operation::DeactivateApiKey, &request).await
    }

    /// Sets the API key used by download and stats calls.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidApiKey`] for a blank key or one that
    /// cannot be sent as a header value (e.g. containing a newline).
    pub fn set_api_key(&self, api_key: &str) -> Result<(), ClientError> {
        if api_key.trim().is_empty() || !is_header_safe(api_key) {
            return Err(ClientError::InvalidApiKey);
        }
        self.transport.credentials().set_api_key(api_key);
        debug!("api key set");
        Ok(())
    }

    // ==================== Downloads ====================

    /// Downloads `url` as `format`, routing by the URL's platform.
    ///
    /// # Errors
    ///
    /// Precondition failures ([`ClientError::ApiKeyRequired`],
    /// [`ClientError::InvalidUrl`], [`ClientError::UnsupportedPlatform`]) are
    /// raised without contacting the service; service failures come back as
    /// [`ClientError::Remote`].
    #[instrument(skip(self, format), fields(format = %format))]
    pub async fn download(&self, url: &str, format: Format) -> Result<DownloadResult, ClientError> {
        self.check_download_target(url)?;
        self.dispatch_download(url, format).await
    }

    /// Like [`download`](Self::download) with the format given by name
    /// (`"mp4"`, `"mp3"`, `"m4a"`, `"wav"`).
    ///
    /// # Errors
    ///
    /// As [`download`](Self::download), plus [`ClientError::InvalidFormat`]
    /// for an unknown name.
    #[instrument(skip(self))]
    pub async fn download_named(
        &self,
        url: &str,
        format: &str,
    ) -> Result<DownloadResult, ClientError> {
        self.check_download_target(url)?;
        let format: Format = format
            .parse()
            .map_err(|_| ClientError::invalid_format(format))?;
        self.dispatch_download(url, format).await
    }

    /// Downloads `url` only if its text names `platform`'s host.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::PlatformMismatch`] before any other check when
    /// the URL does not mention the platform, otherwise as
    /// [`download`](Self::download).
    pub async fn download_from(
        &self,
        platform: Platform,
        url: &str,
        format: Format,
    ) -> Result<DownloadResult, ClientError> {
        if !platform
            .host_markers()
            .iter()
            .any(|marker| url.contains(marker))
        {
            return Err(ClientError::platform_mismatch(platform, url));
        }
        self.download(url, format).await
    }

    /// YouTube shortcut for [`download_from`](Self::download_from).
    ///
    /// # Errors
    ///
    /// See [`download_from`](Self::download_from).
    pub async fn download_youtube(
        &self,
        url: &str,
        format: Format,
    ) -> Result<DownloadResult, ClientError> {
        self.download_from(Platform::Youtube, url, format).await
    }

    /// TikTok shortcut for [`download_from`](Self::download_from).
    ///
    /// # Errors
    ///
    /// See [`download_from`](Self::download_from).
    pub async fn download_tiktok(
        &self,
        url: &str,
        format: Format,
    ) -> Result<DownloadResult, ClientError> {
        self.download_from(Platform::Tiktok, url, format).await
    }

    /// Instagram shortcut for [`download_from`](Self::download_from).
    ///
    /// # Errors
    ///
    /// See [`download_from`](Self::download_from).
    pub async fn download_instagram(
        &self,
        url: &str,
        format: Format,
    ) -> Result<DownloadResult, ClientError> {
        self.download_from(Platform::Instagram, url, format).await
    }

    /// Facebook shortcut for [`download_from`](Self::download_from).
    ///
    /// # Errors
    ///
    /// See [`download_from`](Self::download_from).
    pub async fn download_facebook(
        &self,
        url: &str,
        format: Format,
    ) -> Result<DownloadResult, ClientError> {
        self.download_from(Platform::Facebook, url, format).await
    }

    // ==================== Service ====================

    /// Usage statistics for the current API key.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ApiKeyRequired`] without an API key, or
    /// [`ClientError::Remote`] on service failure.
    #[instrument(skip(self))]
    pub async fn get_stats(&self) -> Result<UsageStats, ClientError> {
        self.require_api_key()?;
        self.call(Operation::Stats, &ApiRequest::new(Route::Stats))
            .await
    }

    /// Whether the service answers at all.
    ///
    /// A 401 counts as reachable: the probe hits the stats route, which
    /// rejects unknown keys. Never retries and never errors.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> bool {
        let timeout = Duration::from_millis(PING_TIMEOUT_MS);
        match self.transport.probe(&Route::Stats, timeout).await {
            Ok(status) => {
                let reachable = status.is_success() || status.as_u16() == HTTP_UNAUTHORIZED;
                debug!(status = status.as_u16(), reachable, "ping answered");
                reachable
            }
            Err(error) => {
                debug!(error = %error, "ping failed");
                false
            }
        }
    }

    /// Configuration snapshot without credential values.
    #[must_use]
    pub fn info(&self) -> ClientInfo {
        let credentials = self.transport.credentials().snapshot();
        ClientInfo {
            base_url: self.transport.base_url().to_string(),
            has_token: credentials.has_token(),
            has_api_key: credentials.has_api_key(),
            timeout_ms: self.config.timeout_ms,
            retries: self.config.retries,
            retry_delay_ms: self.config.retry_delay_ms,
            supported_platforms: Platform::ALL.to_vec(),
            supported_formats: Format::ALL.to_vec(),
        }
    }

    // ==================== Internals ====================

    async fn call<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: &ApiRequest,
    ) -> Result<T, ClientError> {
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| ClientError::remote(operation, e))?;
        response
            .json()
            .map_err(|e| ClientError::remote(operation, e))
    }

    fn require_token(&self) -> Result<(), ClientError> {
        if self.transport.credentials().snapshot().has_token() {
            Ok(())
        } else {
            Err(ClientError::AuthRequired)
        }
    }

    fn require_api_key(&self) -> Result<(), ClientError> {
        if self.transport.credentials().snapshot().has_api_key() {
            Ok(())
        } else {
            Err(ClientError::ApiKeyRequired)
        }
    }

    fn check_download_target(&self, url: &str) -> Result<(), ClientError> {
        self.require_api_key()?;
        if !is_valid_url(url) {
            return Err(ClientError::invalid_url(url));
        }
        Ok(())
    }

    async fn dispatch_download(
        &self,
        url: &str,
        format: Format,
    ) -> Result<DownloadResult, ClientError> {
        let platform = classify_platform(url).ok_or_else(|| ClientError::unsupported_platform(url))?;
        if !platform.supports(format) {
            warn!(
                platform = %platform,
                format = %format,
                "format not advertised for platform, sending anyway"
            );
        }

        let request = ApiRequest::with_body(
            Route::Download(platform),
            json!({"url": url, "type": format.as_str()}),
        );
        let mut result: DownloadResult = self.call(Operation::Download, &request).await?;
        result.attach_formatted_size();
        info!(
            platform = %platform,
            success = result.success,
            size = result.formatted_size.as_deref().unwrap_or("unknown"),
            "download finished"
        );
        Ok(result)
    }
}

fn is_header_safe(value: &str) -> bool {
    HeaderValue::from_str(value).is_ok()
}
