//! User-Agent string sent with every service request.

/// Default User-Agent (crate name and version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");
    format!("{name}/{version}")
}
