//! Default configuration values.
//!
//! Centralized default constants for use across all crates.

// ============================================================================
// Units
// ============================================================================

/// Bytes in one gigabyte (quota inputs arrive in GB).
pub const BYTES_PER_GB: i64 = 1024 * 1024 * 1024;
/// Seconds in one day.
pub const SECS_PER_DAY: i64 = 86_400;
/// Seconds in one hour.
pub const SECS_PER_HOUR: i64 = 3_600;
/// Seconds in one minute.
pub const SECS_PER_MINUTE: i64 = 60;

// ============================================================================
// Generated Client Defaults
// ============================================================================

/// Length of generated trojan/shadowsocks passwords.
pub const DEFAULT_PASSWORD_LENGTH: usize = 32;
/// Length of generated subscription group identifiers.
pub const DEFAULT_SUB_ID_LENGTH: usize = 16;
/// Length of the random REALITY spider path suffix.
pub const SPIDER_PATH_LENGTH: usize = 15;
/// Default VMess client cipher.
pub const DEFAULT_VMESS_SECURITY: &str = "auto";
/// Bounds accepted for configured password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 64;
/// Bounds accepted for configured subscription id length.
pub const MIN_SUB_ID_LENGTH: usize = 4;
pub const MAX_SUB_ID_LENGTH: usize = 64;

// ============================================================================
// Link Defaults
// ============================================================================

/// Default public address used when none is configured.
pub const DEFAULT_LINK_ADDRESS: &str = "127.0.0.1";
/// Default separator between remark parts.
pub const DEFAULT_REMARK_SEPARATOR: &str = " ";
/// Default for enriching remarks with quota and expiry.
pub const DEFAULT_SHOW_INFO: bool = false;
/// VMess share-link JSON version.
pub const VMESS_LINK_VERSION: &str = "2";

// ============================================================================
// Config File Defaults
// ============================================================================

/// Default panel config path.
pub const DEFAULT_CONFIG_PATH: &str = "xui.toml";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Default log format.
pub const DEFAULT_LOG_FORMAT: &str = "pretty";
/// Default log output.
pub const DEFAULT_LOG_OUTPUT: &str = "stderr";
