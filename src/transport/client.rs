//! HTTP transport: credential attachment, timeout, and retries.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use super::credentials::{CredentialStore, Credentials};
use super::error::TransportError;
use super::retry::{RetryContext, RetryDecision, RetryPolicy};
use super::route::{Route, RouteAccess};
use crate::user_agent;

/// Header carrying the API key on usage routes.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Key sent by the liveness probe when no API key is set, so the service
/// answers with 401 rather than treating the request as malformed.
const PROBE_PLACEHOLDER_KEY: &str = "test";

/// One logical call to the service.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    route: Route,
    body: Option<Value>,
}

impl ApiRequest {
    /// A request without a body.
    #[must_use]
    pub fn new(route: Route) -> Self {
        Self { route, body: None }
    }

    /// A request with a JSON body.
    #[must_use]
    pub fn with_body(route: Route, body: Value) -> Self {
        Self {
            route,
            body: Some(body),
        }
    }

    #[must_use]
    pub fn route(&self) -> &Route {
        &self.route
    }
}

/// A successful (2xx) service response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    path: String,
    status: StatusCode,
    body: Value,
}

impl ApiResponse {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The parsed body. An empty body reads as an empty JSON object.
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Deserializes the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Decode`] when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, TransportError> {
        serde_json::from_value(self.body).map_err(|e| TransportError::decode(self.path, e))
    }
}

/// HTTP transport bound to one service base URL and one credential store.
///
/// Cloning is cheap and clones share the connection pool and credentials.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    credentials: CredentialStore,
    retry_policy: RetryPolicy,
}

impl HttpTransport {
    /// Creates a transport for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Build`] if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        retry_policy: RetryPolicy,
        credentials: CredentialStore,
    ) -> Result<Self, TransportError> {
        let client = build_client(timeout).map_err(|source| TransportError::Build { source })?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            credentials,
            retry_policy,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Sends `request`, retrying transport failures per the retry policy.
    ///
    /// # Errors
    ///
    /// Returns the last attempt's error once retries are exhausted, or a
    /// [`TransportError::Build`] at once when the request cannot be built.
    #[instrument(skip(self, request), fields(method = %request.route.method(), path = %request.route.path()))]
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut context = RetryContext::default();
        loop {
            let error = match self.send_once(request, context).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            if !error.is_retryable() {
                debug!(error = %error, "request failed permanently");
                return Err(error);
            }

            match self.retry_policy.should_retry(&mut context) {
                RetryDecision::Retry { delay, attempt } => {
                    warn!(
                        attempt,
                        max_retries = self.retry_policy.max_retries(),
                        delay_ms = delay.as_millis(),
                        error = %error,
                        "retrying request"
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::DoNotRetry { reason } => {
                    debug!(reason = %reason, error = %error, "request failed");
                    return Err(error);
                }
            }
        }
    }

    /// Issues a single attempt of `route` with its own `timeout` and returns
    /// the status code, whatever it is.
    ///
    /// API-key routes always carry a key header, falling back to a placeholder.
    ///
    /// # Errors
    ///
    /// Returns a network or timeout error when no response arrives.
    #[instrument(skip(self), fields(path = %route.path()))]
    pub async fn probe(&self, route: &Route, timeout: Duration) -> Result<StatusCode, TransportError> {
        let path = route.path();
        let credentials = self.credentials.snapshot();
        let builder = self
            .client
            .request(route.method(), self.url_for(&path))
            .timeout(timeout);
        let builder = match route.access() {
            RouteAccess::ApiKey => builder.header(
                API_KEY_HEADER,
                credentials
                    .for_access(RouteAccess::ApiKey)
                    .unwrap_or(PROBE_PLACEHOLDER_KEY),
            ),
            RouteAccess::Session => attach_credentials(builder, route.access(), &credentials),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::network(&path, e))?;
        debug!(status = response.status().as_u16(), "probe answered");
        Ok(response.status())
    }

    async fn send_once(
        &self,
        request: &ApiRequest,
        context: RetryContext,
    ) -> Result<ApiResponse, TransportError> {
        let path = request.route.path();
        let credentials = self.credentials.snapshot();

        let mut builder = self
            .client
            .request(request.route.method(), self.url_for(&path));
        builder = attach_credentials(builder, request.route.access(), &credentials);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(
            is_retry = context.is_retry,
            retries = context.retries,
            "sending request"
        );
        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::network(&path, e))?;
        read_response(path, response).await
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Attaches exactly the credential `access` calls for, if it is held.
fn attach_credentials(
    builder: RequestBuilder,
    access: RouteAccess,
    credentials: &Credentials,
) -> RequestBuilder {
    match (access, credentials.for_access(access)) {
        (RouteAccess::Session, Some(token)) => builder.bearer_auth(token),
        (RouteAccess::ApiKey, Some(api_key)) => builder.header(API_KEY_HEADER, api_key),
        (_, None) => builder,
    }
}

async fn read_response(path: String, response: Response) -> Result<ApiResponse, TransportError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| TransportError::network(&path, e))?;
    let body = parse_body(&text);

    if !status.is_success() {
        return Err(TransportError::status(
            path,
            status.as_u16(),
            error_message(&body),
        ));
    }

    Ok(ApiResponse { path, status, body })
}

/// Parses a response body, keeping non-JSON text as a JSON string.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Object(Map::new());
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Service error bodies carry the message under `error`, sometimes `message`.
fn error_message(body: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .user_agent(user_agent::default_user_agent())
        .gzip(true)
        .build()
}
