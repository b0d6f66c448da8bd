//! Sequential batch downloads with progress events.
//!
//! A batch runs each URL through one [`DownloadClient`] in input order.
//! Per-item failures are recorded and the batch moves on; only client
//! construction and an unusable API key abort the whole run.

use std::time::Duration;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::catalog::{DownloadStatus, Format};
use crate::client::{ClientConfig, ClientError, DownloadClient, DownloadResult};

/// Settings for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub config: ClientConfig,
    pub format: Format,
    /// Pause after each item that got a response, except the last.
    pub delay: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl BatchOptions {
    /// Options using `config`'s batch delay and the default format.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let delay = config.batch_delay();
        Self {
            config,
            format: Format::default(),
            delay,
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Final record for one batch item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub url: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<DownloadResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchOutcome {
    fn from_result(url: &str, result: DownloadResult) -> Self {
        Self {
            url: url.to_string(),
            success: result.success,
            result: Some(result),
            error: None,
        }
    }

    fn from_error(url: &str, error: &ClientError) -> Self {
        Self {
            url: url.to_string(),
            success: false,
            result: None,
            error: Some(error.to_string()),
        }
    }
}

/// Progress event; `current` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchProgress {
    pub current: usize,
    pub total: usize,
    pub url: String,
    pub status: DownloadStatus,
    /// Set once the item reached a terminal status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<BatchOutcome>,
}

/// Runs a batch without progress reporting.
///
/// # Errors
///
/// See [`run_batch_with_progress`].
pub async fn run_batch<S: AsRef<str>>(
    urls: &[S],
    api_key: &str,
    options: BatchOptions,
) -> Result<Vec<BatchOutcome>, ClientError> {
    run_batch_with_progress(urls, api_key, options, |_| {}).await
}

/// Downloads every URL in order, reporting a `Downloading` event before and
/// a terminal event after each item.
///
/// Returns one outcome per input URL, in input order.
///
/// # Errors
///
/// Returns [`ClientError::Config`] or [`ClientError::Transport`] when the
/// client cannot be built and [`ClientError::InvalidApiKey`] for a blank or header-unsafe key.
/// Item failures never abort the batch.
#[instrument(skip(urls, api_key, options, on_progress), fields(total = urls.len(), format = %options.format))]
pub async fn run_batch_with_progress<S, F>(
    urls: &[S],
    api_key: &str,
    options: BatchOptions,
    mut on_progress: F,
) -> Result<Vec<BatchOutcome>, ClientError>
where
    S: AsRef<str>,
    F: FnMut(&BatchProgress),
{
    let client = DownloadClient::with_config(options.config)?;
    client.set_api_key(api_key)?;

    let total = urls.len();
    let mut outcomes = Vec::with_capacity(total);

    for (index, url) in urls.iter().enumerate() {
        let url = url.as_ref();
        let current = index + 1;
        let event = |status: DownloadStatus, outcome: Option<BatchOutcome>| BatchProgress {
            current,
            total,
            url: url.to_string(),
            status,
            outcome,
        };

        on_progress(&event(DownloadStatus::Downloading, None));

        match client.download(url, options.format).await {
            Ok(result) => {
                let status = if result.success {
                    DownloadStatus::Completed
                } else {
                    DownloadStatus::Failed
                };
                let outcome = BatchOutcome::from_result(url, result);
                on_progress(&event(status, Some(outcome.clone())));
                outcomes.push(outcome);

                if current < total && !options.delay.is_zero() {
                    tokio::time::sleep(options.delay).await;
                }
            }
            Err(error) => {
                warn!(current, url, error = %error, "batch item failed");
                let outcome = BatchOutcome::from_error(url, &error);
                on_progress(&event(DownloadStatus::Error, Some(outcome.clone())));
                outcomes.push(outcome);
            }
        }
    }

    let succeeded = outcomes.iter().filter(|outcome| outcome.success).count();
    info!(succeeded, failed = total - succeeded, "batch finished");
    Ok(outcomes)
}

/// One-shot download with a throwaway client.
///
/// # Errors
///
/// Any [`ClientError`] from client construction, [`DownloadClient::set_api_key`]
/// or [`DownloadClient::download`].
pub async fn quick_download(
    url: &str,
    api_key: &str,
    format: Format,
    config: ClientConfig,
) -> Result<DownloadResult, ClientError> {
    let client = DownloadClient::with_config(config)?;
    client.set_api_key(api_key)?;
    client.download(url, format).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn offline_options() -> BatchOptions {
        BatchOptions::new(ClientConfig::with_base_url("http://127.0.0.1:9"))
            .with_delay(Duration::ZERO)
    }

    #[test]
    fn test_options_take_delay_from_config() {
        let config = ClientConfig {
            batch_delay_ms: 250,
            ..ClientConfig::default()
        };
        let options = BatchOptions::new(config).with_format(Format::Wav);
        assert_eq!(options.delay, Duration::from_millis(250));
        assert_eq!(options.format, Format::Wav);
    }

    #[tokio::test]
    async fn test_blank_api_key_aborts_batch() {
        let mut events = 0;
        let result =
            run_batch_with_progress(&["https://youtu.be/abc"], " ", offline_options(), |_| {
                events += 1;
            })
            .await;
        assert!(matches!(result, Err(ClientError::InvalidApiKey)));
        assert_eq!(events, 0);
    }

    #[tokio::test]
    async fn test_local_failures_are_recorded_in_order() {
        let urls = ["badurl", "https://vimeo.com/1"];
        let mut statuses = Vec::new();
        let outcomes = run_batch_with_progress(&urls, "k", offline_options(), |progress| {
            statuses.push((progress.current, progress.status));
        })
        .await
        .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].url, "badurl");
        assert!(!outcomes[0].success);
        assert!(outcomes[0].error.as_deref().unwrap().contains("badurl"));
        assert!(outcomes[1].error.as_deref().unwrap().contains("vimeo.com"));
        assert_eq!(
            statuses,
            vec![
                (1, DownloadStatus::Downloading),
                (1, DownloadStatus::Error),
                (2, DownloadStatus::Downloading),
                (2, DownloadStatus::Error),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let urls: [&str; 0] = [];
        let outcomes = run_batch(&urls, "k", offline_options()).await.unwrap();
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_quick_download_rejects_blank_key() {
        let result = quick_download(
            "https://youtu.be/abc",
            "",
            Format::Mp4,
            ClientConfig::default(),
        )
        .await;
        assert!(matches!(result, Err(ClientError::InvalidApiKey)));
    }
}
