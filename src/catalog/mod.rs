//! Fixed enumerations and constants shared by every other module.
//!
//! Nothing here is mutated at runtime: platforms, formats, status tags,
//! canonical messages, and configuration defaults are all `const` data or
//! plain enums with `match`-based lookups.

mod constants;
mod format;
pub mod messages;
mod platform;
mod status;

pub use constants::{
    DEFAULT_BASE_URL, DEFAULT_BATCH_DELAY_MS, DEFAULT_RETRIES, DEFAULT_RETRY_DELAY_MS,
    DEFAULT_TIMEOUT_MS, HTTP_TOO_MANY_REQUESTS, HTTP_UNAUTHORIZED, PING_TIMEOUT_MS,
};
pub use format::{Format, FormatInfo, MediaKind};
pub use platform::{Platform, PlatformInfo};
pub use status::DownloadStatus;
