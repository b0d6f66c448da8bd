use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle tag of a single download, as reported in batch progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadStatus {
    /// Not started yet.
    Pending,
    /// Request dispatched, awaiting the service.
    Downloading,
    /// The service reported success.
    Completed,
    /// The service answered but reported failure.
    Failed,
    /// The call itself failed (precondition, transport, or service error).
    Error,
}

impl DownloadStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Downloading => "downloading",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Error => "error",
        }
    }

    /// Whether no further events follow for this item.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Error)
    }
}

impl fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!DownloadStatus::Pending.is_terminal());
        assert!(!DownloadStatus::Downloading.is_terminal());
        assert!(DownloadStatus::Completed.is_terminal());
        assert!(DownloadStatus::Error.is_terminal());
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(DownloadStatus::Downloading.to_string(), "downloading");
        assert_eq!(
            serde_json::to_value(DownloadStatus::Failed).ok(),
            Some(serde_json::json!("failed"))
        );
    }
}
