//! Display labels embedded in links.

use std::time::{SystemTime, UNIX_EPOCH};

use xui_config::LinksConfig;
use xui_core::{DEFAULT_REMARK_SEPARATOR, DEFAULT_SHOW_INFO};
use xui_inbound::Inbound;

use crate::format::{format_traffic, remaining_time};

/// Prefix of a remark for a client whose traffic record is disabled.
pub const DISABLED_MARKER: &str = "\u{26d4}\u{fe0f}N/A";
const QUOTA_SUFFIX: &str = "\u{1f4ca}";
const EXPIRY_SUFFIX: &str = "\u{23f3}";

/// Rendering options shared by every encoder call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkContext {
    /// Append remaining quota and expiry from the inbound's traffic records.
    pub show_info: bool,
    /// Reference time in unix seconds.
    pub now: i64,
    /// Joins remark parts.
    pub separator: String,
}

impl LinkContext {
    /// Context at the current wall-clock time.
    pub fn new() -> Self {
        Self {
            show_info: DEFAULT_SHOW_INFO,
            now: unix_now(),
            separator: DEFAULT_REMARK_SEPARATOR.to_string(),
        }
    }

    pub fn from_config(config: &LinksConfig) -> Self {
        Self {
            show_info: config.show_info,
            separator: config.remark_separator.clone(),
            ..Self::new()
        }
    }

    pub fn with_show_info(mut self, show_info: bool) -> Self {
        self.show_info = show_info;
        self
    }

    pub fn at(mut self, now: i64) -> Self {
        self.now = now;
        self
    }
}

impl Default for LinkContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Current unix time in seconds.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Build the label for `email` on `inbound`, with an optional `extra` suffix.
///
/// Non-empty parts (inbound remark, email, extra) are joined with the
/// context separator. With `show_info`, the client's traffic record adds the
/// remaining quota and time, or replaces the label prefix with
/// [`DISABLED_MARKER`] when the record is disabled.
pub fn build_remark(inbound: &Inbound, email: &str, extra: &str, ctx: &LinkContext) -> String {
    let mut parts: Vec<String> = [inbound.remark.as_str(), email, extra]
        .into_iter()
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect();

    if ctx.show_info
        && let Some(stats) = inbound.client_traffic(email)
    {
        if !stats.enable {
            return format!("{}{}{}", DISABLED_MARKER, ctx.separator, parts.join(ctx.separator.as_str()));
        }
        if let Some(left) = stats.remaining()
            && left > 0
        {
            parts.push(format!("{}{}", format_traffic(left), QUOTA_SUFFIX));
        }
        if let Some(left) = remaining_time(stats.expiry_time, ctx.now) {
            parts.push(format!("{}{}", left, EXPIRY_SUFFIX));
        }
    }

    parts.join(ctx.separator.as_str())
}
