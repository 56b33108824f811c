//! Link error types.

use xui_core::{ERROR_CLIENT_EXISTS, ERROR_UNSUPPORTED_PROTOCOL};
use xui_inbound::DecodeError;

/// Hard failures of link and client operations.
///
/// A missing client or a protocol mismatch is not an error: encoders return
/// an empty string for those.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("decode: {0}")]
    Decode(#[from] DecodeError),
    #[error("unsupported protocol: {0}")]
    UnsupportedProtocol(String),
    #[error("client already exists: {0}")]
    ClientExists(String),
}

impl LinkError {
    /// Get the error kind label for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            LinkError::Decode(e) => e.error_kind(),
            LinkError::UnsupportedProtocol(_) => ERROR_UNSUPPORTED_PROTOCOL,
            LinkError::ClientExists(_) => ERROR_CLIENT_EXISTS,
        }
    }
}
