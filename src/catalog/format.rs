//! Download output formats.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Broad media category of a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Video,
    Audio,
}

/// Static metadata describing a [`Format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    /// File extension without the leading dot.
    pub extension: &'static str,
    pub kind: MediaKind,
    pub description: &'static str,
    pub mime_type: &'static str,
}

/// Output encoding requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Mp4,
    Mp3,
    M4a,
    Wav,
}

impl Format {
    /// Every format, in declaration order.
    pub const ALL: [Self; 4] = [Self::Mp4, Self::Mp3, Self::M4a, Self::Wav];

    /// Returns the wire name sent as the `type` field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
            Self::Wav => "wav",
        }
    }

    /// Returns the static metadata for this format.
    #[must_use]
    pub fn info(&self) -> FormatInfo {
        match self {
            Self::Mp4 => FormatInfo {
                extension: "mp4",
                kind: MediaKind::Video,
                description: "MP4 video (H.264)",
                mime_type: "video/mp4",
            },
            Self::Mp3 => FormatInfo {
                extension: "mp3",
                kind: MediaKind::Audio,
                description: "MP3 audio (192kbps)",
                mime_type: "audio/mpeg",
            },
            Self::M4a => FormatInfo {
                extension: "m4a",
                kind: MediaKind::Audio,
                description: "AAC audio (M4A)",
                mime_type: "audio/mp4",
            },
            Self::Wav => FormatInfo {
                extension: "wav",
                kind: MediaKind::Audio,
                description: "WAV audio (uncompressed)",
                mime_type: "audio/wav",
            },
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| format!("invalid format: {s}"))
    }
}
