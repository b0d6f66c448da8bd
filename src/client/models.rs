//! Request and response shapes exchanged with the service.
//!
//! Service envelopes are only loosely specified, so every model keeps the
//! fields it does not know about in `extra` instead of dropping them.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::catalog::{Format, Platform};
use crate::size::format_bytes;

/// An id the service may send as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(i64),
    Text(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Result of a successful registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrationResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default, alias = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of a successful login; `token` becomes the session credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResult {
    #[serde(default)]
    pub success: bool,
    pub token: String,
    #[serde(default, alias = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Identifier>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An API key as reported by the key management routes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Identifier>,
    #[serde(
        default,
        alias = "keyName",
        alias = "key_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    /// The key itself; usually only present right after generation.
    #[serde(
        default,
        alias = "apiKey",
        alias = "api_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub key: Option<String>,
    #[serde(
        default,
        alias = "isActive",
        alias = "is_active",
        skip_serializing_if = "Option::is_none"
    )]
    pub active: Option<bool>,
    #[serde(
        default,
        alias = "createdAt",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Key listings arrive either bare or wrapped in an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ApiKeyList {
    Bare(Vec<ApiKeyRecord>),
    Wrapped {
        #[serde(alias = "apiKeys", alias = "api_keys")]
        keys: Vec<ApiKeyRecord>,
    },
}

impl ApiKeyList {
    pub(crate) fn into_records(self) -> Vec<ApiKeyRecord> {
        match self {
            Self::Bare(keys) | Self::Wrapped { keys } => keys,
        }
    }
}

/// Generic acknowledgement envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceMessage {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Usage statistics for the current API key, passed through as reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl UsageStats {
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// Outcome of one download call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadResult {
    #[serde(default)]
    pub success: bool,
    /// Size in bytes as reported by the service. Fractional or float-encoded
    /// sizes are rounded; negative or non-finite ones read as unknown.
    #[serde(
        default,
        deserialize_with = "lenient_size",
        skip_serializing_if = "Option::is_none"
    )]
    pub file_size: Option<u64>,
    /// `file_size` rendered for humans, added client-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DownloadResult {
    /// Fills `formatted_size` for successful results with a known, non-zero size.
    pub(crate) fn attach_formatted_size(&mut self) {
        if self.success
            && let Some(size) = self.file_size.filter(|size| *size > 0)
        {
            self.formatted_size = Some(format_bytes(size, 2));
        }
    }
}

/// Snapshot of a client's configuration; credential values are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientInfo {
    pub base_url: String,
    pub has_token: bool,
    pub has_api_key: bool,
    pub timeout_ms: u64,
    pub retries: u32,
    pub retry_delay_ms: u64,
    pub supported_platforms: Vec<Platform>,
    pub supported_formats: Vec<Format>,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lenient_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(size) = number.as_u64() {
        return Ok(Some(size));
    }
    Ok(number
        .as_f64()
        .filter(|size| size.is_finite() && *size >= 0.0)
        .map(|size| size.round() as u64))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_download_result_keeps_unknown_fields() {
        let result: DownloadResult = serde_json::from_value(json!({
            "success": true,
            "file_size": 1536,
            "title": "Some video",
            "duration": 212
        }))
        .unwrap();
        assert_eq!(result.file_size, Some(1536));
        assert_eq!(result.extra.get("title"), Some(&json!("Some video")));
        assert_eq!(result.extra.get("duration"), Some(&json!(212)));
    }

    #[test]
    fn test_download_result_accepts_float_sizes() {
        let mut result: DownloadResult =
            serde_json::from_value(json!({"success": true, "file_size": 1536.0})).unwrap();
        assert_eq!(result.file_size, Some(1536));
        result.attach_formatted_size();
        assert_eq!(result.formatted_size.as_deref(), Some("1.5 KB"));

        let result: DownloadResult =
            serde_json::from_value(json!({"success": true, "file_size": -4})).unwrap();
        assert_eq!(result.file_size, None);

        let result: DownloadResult =
            serde_json::from_value(json!({"success": true, "file_size": null})).unwrap();
        assert_eq!(result.file_size, None);
    }

    #[test]
    fn test_attach_formatted_size() {
        let mut result = DownloadResult {
            success: true,
            file_size: Some(1536),
            ..DownloadResult::default()
        };
        result.attach_formatted_size();
        assert_eq!(result.formatted_size.as_deref(), Some("1.5 KB"));
        assert_eq!(result.file_size, Some(1536));
    }

    #[test]
    fn test_attach_formatted_size_skips_failures_and_zero() {
        let mut failed = DownloadResult {
            success: false,
            file_size: Some(1536),
            ..DownloadResult::default()
        };
        failed.attach_formatted_size();
        assert_eq!(failed.formatted_size, None);

        let mut empty = DownloadResult {
            success: true,
            file_size: Some(0),
            ..DownloadResult::default()
        };
        empty.attach_formatted_size();
        assert_eq!(empty.formatted_size, None);
    }

    #[test]
    fn test_api_key_list_accepts_both_shapes() {
        let bare: ApiKeyList =
            serde_json::from_value(json!([{"id": 1, "keyName": "ci"}])).unwrap();
        let wrapped: ApiKeyList = serde_json::from_value(json!({
            "success": true,
            "apiKeys": [{"id": "k-2", "key_name": "laptop", "is_active": false}]
        }))
        .unwrap();

        let bare = bare.into_records();
        assert_eq!(bare[0].id, Some(Identifier::Number(1)));
        assert_eq!(bare[0].name.as_deref(), Some("ci"));

        let wrapped = wrapped.into_records();
        assert_eq!(wrapped[0].id, Some(Identifier::Text("k-2".to_string())));
        assert_eq!(wrapped[0].active, Some(false));
    }

    #[test]
    fn test_login_result_accepts_camel_case_user_id() {
        let login: LoginResult =
            serde_json::from_value(json!({"token": "t", "userId": 7})).unwrap();
        assert_eq!(login.user_id, Some(Identifier::Number(7)));
        assert!(login.extra.is_empty());
    }

    #[test]
    fn test_identifier_display() {
        assert_eq!(Identifier::Number(42).to_string(), "42");
        assert_eq!(Identifier::Text("abc".into()).to_string(), "abc");
    }
}
