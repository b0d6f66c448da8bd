//! Content platforms the service can download from.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::Format;

/// Static metadata describing a [`Platform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformInfo {
    /// Display name.
    pub name: &'static str,
    /// Primary domain.
    pub domain: &'static str,
    /// Formats the service advertises for this platform.
    pub supported_formats: &'static [Format],
    /// Longest content the service accepts, when limited.
    pub max_duration: Option<Duration>,
    pub requires_auth: bool,
    pub note: Option<&'static str>,
}

/// A content source a URL can be classified as.
///
/// Declaration order is significant: classification tests platforms in this
/// order and returns the first match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Tiktok,
    Instagram,
    Facebook,
    Spotify,
}

const ALL_FORMATS: &[Format] = &[Format::Mp4, Format::Mp3, Format::M4a, Format::Wav];
const COMMON_FORMATS: &[Format] = &[Format::Mp4, Format::Mp3, Format::M4a];

impl Platform {
    /// Every platform, in classification order.
    pub const ALL: [Self; 5] = [
        Self::Youtube,
        Self::Tiktok,
        Self::Instagram,
        Self::Facebook,
        Self::Spotify,
    ];

    /// Returns the identifier used in route paths.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Tiktok => "tiktok",
            Self::Instagram => "instagram",
            Self::Facebook => "facebook",
            Self::Spotify => "spotify",
        }
    }

    /// Host substrings used by the per-platform download shortcuts.
    ///
    /// This is a cheap plausibility check, much looser than classification.
    #[must_use]
    pub fn host_markers(&self) -> &'static [&'static str] {
        match self {
            Self::Youtube => &["youtube.com", "youtu.be"],
            Self::Tiktok => &["tiktok.com"],
            Self::Instagram => &["instagram.com"],
            Self::Facebook => &["facebook.com"],
            Self::Spotify => &["spotify.com"],
        }
    }

    /// Returns the static metadata for this platform.
    #[must_use]
    pub fn info(&self) -> PlatformInfo {
        match self {
            Self::Youtube => PlatformInfo {
                name: "YouTube",
                domain: "youtube.com",
                supported_formats: ALL_FORMATS,
                max_duration: None,
                requires_auth: false,
                note: None,
            },
            Self::Tiktok => PlatformInfo {
                name: "TikTok",
                domain: "tiktok.com",
                supported_formats: COMMON_FORMATS,
                max_duration: Some(Duration::from_secs(600)),
                requires_auth: false,
                note: None,
            },
            Self::Instagram => PlatformInfo {
                name: "Instagram",
                domain: "instagram.com",
                supported_formats: COMMON_FORMATS,
                max_duration: Some(Duration::from_secs(3600)),
                requires_auth: false,
                note: None,
            },
            Self::Facebook => PlatformInfo {
                name: "Facebook",
                domain: "facebook.com",
                supported_formats: COMMON_FORMATS,
                max_duration: None,
                requires_auth: false,
                note: None,
            },
            Self::Spotify => PlatformInfo {
                name: "Spotify",
                domain: "open.spotify.com",
                supported_formats: &[],
                max_duration: None,
                requires_auth: true,
                note: Some("metadata only"),
            },
        }
    }

    /// Whether the service advertises `format` for this platform.
    #[must_use]
    pub fn supports(&self, format: Format) -> bool {
        self.info().supported_formats.contains(&format)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str() == s)
            .ok_or_else(|| format!("invalid platform: {s}"))
    }
}
