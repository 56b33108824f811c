//! Decode error types.

use xui_core::ERROR_DECODE;

/// A settings blob that is not syntactically valid JSON.
///
/// Absent or mistyped fields never produce this error; they fall back to
/// empty defaults during decoding.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("settings: {0}")]
    Settings(#[source] serde_json::Error),
    #[error("stream settings: {0}")]
    StreamSettings(#[source] serde_json::Error),
}

impl DecodeError {
    /// Get the error kind label for logging.
    pub fn error_kind(&self) -> &'static str {
        ERROR_DECODE
    }
}
