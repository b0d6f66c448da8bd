//! Static regex tables for platform detection and content-id extraction.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::Platform;

// Patterns run with `(?i-u)`: `\w`, `\d` and case folding are ASCII-only.
// Wildcards and negated classes opt back into Unicode with `(?u:...)` so they
// still step over whole characters.

/// Shared YouTube id pattern: it both classifies and captures the 11-char id.
const YOUTUBE_ID: &str = r#"(?i-u)(?:youtube\.com/(?:(?u:[^/]+)/(?u:.+)/|(?:v|e(?:mbed)?)/|(?u:.*)[?&]v=)|youtu\.be/)((?u:[^"&?/\s]){11})"#;

#[allow(clippy::expect_used)]
fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).expect("platform regex is valid")) // Static pattern, safe to panic
        .collect()
}

#[allow(clippy::expect_used)]
fn compile_one(pattern: &str) -> Regex {
    Regex::new(pattern).expect("extraction regex is valid") // Static pattern, safe to panic
}

static YOUTUBE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        YOUTUBE_ID,
        r"(?i-u)^https?://(www\.)?(youtube\.com|youtu\.be)/",
    ])
});

static TIKTOK: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i-u)^https?://(www\.)?tiktok\.com/@[\w.-]+/video/\d+",
        r"(?i-u)^https?://(vm|m)\.tiktok\.com/[\w.-]+",
    ])
});

static INSTAGRAM: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"(?i-u)^https?://(www\.)?instagram\.com/(p|reel|tv)/[\w-]+"]));

static FACEBOOK: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i-u)^https?://(www\.)?facebook\.com/(?u:.*)/videos/\d+",
        r"(?i-u)^https?://(www\.)?fb\.watch/[\w-]+",
    ])
});

static SPOTIFY: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"(?i-u)^https?://open\.spotify\.com/(track|album|playlist)/\w+"]));

static YOUTUBE_EXTRACT: LazyLock<Regex> = LazyLock::new(|| compile_one(YOUTUBE_ID));
static TIKTOK_EXTRACT: LazyLock<Regex> = LazyLock::new(|| compile_one(r"(?i-u)video/(\d+)"));
static INSTAGRAM_EXTRACT: LazyLock<Regex> =
    LazyLock::new(|| compile_one(r"(?i-u)instagram\.com/(p|reel|tv)/([\w-]+)"));
static FACEBOOK_EXTRACT: LazyLock<Regex> = LazyLock::new(|| compile_one(r"(?i-u)videos/(\d+)"));
static SPOTIFY_EXTRACT: LazyLock<Regex> =
    LazyLock::new(|| compile_one(r"(?i-u)spotify\.com/(track|album|playlist)/(\w+)"));

/// Ordered detection patterns for `platform`.
pub(super) fn detection_patterns(platform: Platform) -> &'static [Regex] {
    match platform {
        Platform::Youtube => YOUTUBE.as_slice(),
        Platform::Tiktok => TIKTOK.as_slice(),
        Platform::Instagram => INSTAGRAM.as_slice(),
        Platform::Facebook => FACEBOOK.as_slice(),
        Platform::Spotify => SPOTIFY.as_slice(),
    }
}

/// Extraction pattern for `platform` and the capture group holding the id.
pub(super) fn extraction_pattern(platform: Platform) -> (&'static Regex, usize) {
    match platform {
        Platform::Youtube => (&*YOUTUBE_EXTRACT, 1),
        Platform::Tiktok => (&*TIKTOK_EXTRACT, 1),
        Platform::Instagram => (&*INSTAGRAM_EXTRACT, 2),
        Platform::Facebook => (&*FACEBOOK_EXTRACT, 1),
        Platform::Spotify => (&*SPOTIFY_EXTRACT, 2),
    }
}
