//! Error record - one captured failure event.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::kind::ErrorKind;

/// Capture timestamp format (local clock).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One caught failure, as it appears in the log view, the JSON dump, and the
/// CSV download.
///
/// Serde names match the export header so every surface shows the same
/// columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Capture time, `YYYY-MM-DD HH:MM:SS`
    #[serde(rename = "時刻")]
    pub timestamp: String,

    /// Which drill raised it
    #[serde(rename = "場所")]
    pub location: String,

    /// Symbolic failure category
    #[serde(rename = "エラー")]
    pub error_kind: String,

    /// Raw input that triggered the failure, already stringified
    #[serde(rename = "入力値")]
    pub input_value: String,

    /// Human-readable explanation
    #[serde(rename = "メッセージ")]
    pub message: String,
}

impl ErrorRecord {
    /// Build a record stamped with the current local time.
    pub fn capture(
        location: impl Into<String>,
        kind: ErrorKind,
        input_value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            location: location.into(),
            error_kind: kind.as_str().to_string(),
            input_value: input_value.into(),
            message: message.into(),
        }
    }

    /// Override the capture time (tests, replay).
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }
}
