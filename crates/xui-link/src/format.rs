//! Human readable traffic and time formatting.

use std::cmp::Ordering;

use xui_core::{SECS_PER_DAY, SECS_PER_HOUR, SECS_PER_MINUTE};

/// Format a byte count with binary units and two decimals, e.g. `1.50GB`.
#[allow(clippy::cast_precision_loss)]
pub fn format_traffic(bytes: i64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.2}{}", size, UNITS[unit])
}

/// Format a quota where 0 means unlimited.
pub fn format_quota(bytes: i64) -> String {
    if bytes <= 0 {
        "Unlimited".to_string()
    } else {
        format_traffic(bytes)
    }
}

/// Coarse duration: days and hours, else hours, else minutes.
pub fn format_duration(secs: i64) -> String {
    let secs = secs.max(0);
    let days = secs / SECS_PER_DAY;
    let hours = (secs % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (secs % SECS_PER_HOUR) / SECS_PER_MINUTE;

    match (days, hours) {
        (0, 0) => format!("{}M", minutes),
        (0, h) => format!("{}H", h),
        (d, 0) => format!("{}D", d),
        (d, h) => format!("{}D,{}H", d, h),
    }
}

/// Time left on an expiry timestamp in milliseconds, seen from `now` (unix seconds).
///
/// Positive timestamps are absolute deadlines and count down to `0M` once
/// passed. Negative timestamps are a duration that starts on first use and
/// are rendered by magnitude. Zero means no expiry.
pub fn remaining_time(expiry_ms: i64, now: i64) -> Option<String> {
    let expiry = expiry_ms / 1000;
    match expiry.cmp(&0) {
        Ordering::Greater => Some(format_duration(expiry.saturating_sub(now))),
        Ordering::Less => Some(format_duration(expiry.saturating_abs())),
        Ordering::Equal => None,
    }
}

/// Expiry column for client listings.
pub fn format_expiry(expiry_ms: i64, now: i64) -> String {
    let expiry = expiry_ms / 1000;
    match expiry.cmp(&0) {
        Ordering::Equal => "Never".to_string(),
        Ordering::Greater if expiry <= now => "Expired".to_string(),
        Ordering::Greater => format!("in {}", format_duration(expiry.saturating_sub(now))),
        Ordering::Less => format!("{} after first use", format_duration(expiry.saturating_abs())),
    }
}
