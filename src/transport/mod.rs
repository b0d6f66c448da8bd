//! Transport layer between the client facade and the remote service.
//!
//! # Features
//!
//! - Routes declare the credential they need ([`RouteAccess`]); headers are
//!   attached from that tag, never from path matching
//! - Bearer token and API key live in a shared [`CredentialStore`]
//! - Configurable overall timeout (3 minutes by default)
//! - Bounded retries with linear backoff ([`RetryPolicy`])
//! - Structured errors ([`TransportError`]) surfaced unchanged after retries
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use media_download_client::transport::{
//!     ApiRequest, CredentialStore, HttpTransport, RetryPolicy, Route,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = CredentialStore::new();
//! credentials.set_api_key("my-key");
//!
//! let transport = HttpTransport::new(
//!     "http://localhost:3000",
//!     Duration::from_secs(180),
//!     RetryPolicy::default(),
//!     credentials,
//! )?;
//! let response = transport.send(&ApiRequest::new(Route::Stats)).await?;
//! println!("{}", response.body());
//! # Ok(())
//! # }
//! ```

mod client;
mod credentials;
mod error;
mod retry;
mod route;

pub use client::{API_KEY_HEADER, ApiRequest, ApiResponse, HttpTransport};
pub use credentials::{CredentialStore, Credentials};
pub use error::TransportError;
pub use retry::{RetryContext, RetryDecision, RetryPolicy};
pub use route::{Route, RouteAccess};
