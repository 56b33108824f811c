//! Error kind labels for logging.
//!
//! These constants provide consistent error classification across all crates.

/// Malformed settings or stream settings JSON.
pub const ERROR_DECODE: &str = "decode";
/// Operation requested for a protocol outside the supported set.
pub const ERROR_UNSUPPORTED_PROTOCOL: &str = "unsupported_protocol";
/// Client email already present in the inbound.
pub const ERROR_CLIENT_EXISTS: &str = "client_exists";
/// I/O error.
pub const ERROR_IO: &str = "io";
/// Configuration error.
pub const ERROR_CONFIG: &str = "config";
