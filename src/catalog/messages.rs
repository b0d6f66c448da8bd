//! Canonical user-facing error messages.
//!
//! Error types format their `Display` output from these so the wording stays
//! identical wherever a condition is reported.

pub const AUTH_REQUIRED: &str = "authentication required: log in first";
pub const API_KEY_REQUIRED: &str = "API key required: set an API key first";
pub const INVALID_API_KEY: &str = "invalid API key";
pub const INVALID_TOKEN: &str = "login returned an unusable session token";
pub const INVALID_URL: &str = "invalid URL";
pub const INVALID_FORMAT: &str = "invalid download format";
pub const UNSUPPORTED_PLATFORM: &str = "unsupported platform";
pub const NETWORK_ERROR: &str = "could not connect to the download API";
pub const RATE_LIMIT_EXCEEDED: &str = "request rate limit exceeded";
pub const DOWNLOAD_FAILED: &str = "content download failed";

pub const REGISTRATION_FAILED: &str = "registration failed";
pub const LOGIN_FAILED: &str = "login failed";
pub const GENERATE_API_KEY_FAILED: &str = "failed to generate API key";
pub const LIST_API_KEYS_FAILED: &str = "failed to list API keys";
pub const DEACTIVATE_API_KEY_FAILED: &str = "failed to deactivate API key";
pub const STATS_FAILED: &str = "failed to fetch usage statistics";
