//! URL validation and platform classification.
//!
//! Classification walks [`Platform::ALL`] in declaration order and, within a
//! platform, its patterns in table order; the first match wins. This makes
//! ambiguous URLs resolve deterministically.
//!
//! # Example
//!
//! ```
//! use media_download_client::Platform;
//! use media_download_client::classifier::{classify_platform, extract_content_id};
//!
//! let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
//! assert_eq!(classify_platform(url), Some(Platform::Youtube));
//! assert_eq!(extract_content_id(url).id.as_deref(), Some("dQw4w9WgXcQ"));
//! ```

mod patterns;

use serde::Serialize;
use tracing::trace;
use url::Url;

use crate::catalog::Platform;

/// Platform and content identifier recovered from a URL.
///
/// `id` may be `None` while `platform` is `Some`: the extraction patterns are
/// stricter than the detection patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentId {
    pub platform: Option<Platform>,
    pub id: Option<String>,
}

/// Returns true iff `url` is an absolute `http` or `https` URL.
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok_and(|parsed| matches!(parsed.scheme(), "http" | "https"))
}

/// Classifies `url` into the first platform whose patterns match.
///
/// Returns `None` for invalid URLs and URLs no platform recognizes.
#[must_use]
pub fn classify_platform(url: &str) -> Option<Platform> {
    if !is_valid_url(url) {
        return None;
    }

    let platform = Platform::ALL.into_iter().find(|platform| {
        patterns::detection_patterns(*platform)
            .iter()
            .any(|pattern| pattern.is_match(url))
    });
    trace!(url, platform = ?platform, "classified URL");
    platform
}

/// Extracts the platform-specific content identifier from `url`.
#[must_use]
pub fn extract_content_id(url: &str) -> ContentId {
    let Some(platform) = classify_platform(url) else {
        return ContentId::default();
    };

    let (pattern, group) = patterns::extraction_pattern(platform);
    let id = pattern
        .captures(url)
        .and_then(|captures| captures.get(group))
        .map(|m| m.as_str().to_string());

    ContentId {
        platform: Some(platform),
        id,
    }
}
