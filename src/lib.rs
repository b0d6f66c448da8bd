//! Media Download Client Library
//!
//! Async client for a remote media-download service that fetches content
//! from YouTube, TikTok, Instagram, Facebook, and Spotify.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`catalog`] - Platforms, formats, statuses, defaults, and messages
//! - [`classifier`] - URL validation, platform detection, content ids
//! - [`transport`] - HTTP transport with credential attachment and retries
//! - [`client`] - Validating facade over the service operations
//! - [`batch`] - Sequential batch downloads with progress events
//! - [`size`] - Human-readable byte sizes

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod catalog;
pub mod classifier;
pub mod client;
pub mod size;
pub mod transport;
mod user_agent;

// Re-export commonly used types
pub use batch::{
    BatchOptions, BatchOutcome, BatchProgress, quick_download, run_batch, run_batch_with_progress,
};
pub use catalog::{DownloadStatus, Format, FormatInfo, MediaKind, Platform, PlatformInfo};
pub use classifier::{ContentId, classify_platform, extract_content_id, is_valid_url};
pub use client::{
    ApiKeyRecord, ClientConfig, ClientError, ClientInfo, ConfigError, DownloadClient,
    DownloadResult, LoginResult, RegistrationResult, UsageStats,
};
pub use size::format_bytes;
pub use transport::{RetryPolicy, TransportError};
