//! Configuration type definitions for links, generated clients and logging.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub clients: ClientsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How share links are rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Public address placed in links that target the inbound itself.
    #[serde(default = "default_link_address")]
    pub address: String,
    /// Append remaining quota and expiry to each remark.
    #[serde(default = "default_show_info")]
    pub show_info: bool,
    /// Separator joining remark parts.
    #[serde(default = "default_remark_separator")]
    pub remark_separator: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            address: default_link_address(),
            show_info: default_show_info(),
            remark_separator: default_remark_separator(),
        }
    }
}

/// Parameters for generated clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientsConfig {
    /// Length of generated trojan/shadowsocks passwords.
    #[serde(default = "default_password_length")]
    pub password_length: usize,
    /// Length of generated subscription ids.
    #[serde(default = "default_sub_id_length")]
    pub sub_id_length: usize,
}

impl Default for ClientsConfig {
    fn default() -> Self {
        Self {
            password_length: default_password_length(),
            sub_id_length: default_sub_id_length(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: Option<String>,
    /// Log format: json, pretty, or compact. Default: pretty.
    pub format: Option<String>,
    /// Output target: stdout or stderr. Default: stderr.
    pub output: Option<String>,
    /// Per-module log level filters (e.g., {"xui_link": "debug"}).
    #[serde(default)]
    pub filters: HashMap<String, String>,
}
