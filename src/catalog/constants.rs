//! Default configuration values and the HTTP status codes the client inspects.

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Overall request timeout (3 minutes; downloads are processed server-side).
pub const DEFAULT_TIMEOUT_MS: u64 = 180_000;

/// Maximum number of retries after the initial attempt.
pub const DEFAULT_RETRIES: u32 = 3;

/// Base delay for linear retry backoff.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

/// Pause between consecutive batch items.
pub const DEFAULT_BATCH_DELAY_MS: u64 = 1_000;

/// Fixed timeout for the liveness probe.
pub const PING_TIMEOUT_MS: u64 = 5_000;

/// Answer from the stats route that still proves the service is up.
pub const HTTP_UNAUTHORIZED: u16 = 401;

/// Rate limiting; reported with its own message when the body has none.
pub const HTTP_TOO_MANY_REQUESTS: u16 = 429;
