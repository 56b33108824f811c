//! Configuration loading and CLI definitions.

mod defaults;
mod loader;
mod types;
mod validate;

use clap::Parser;

pub use loader::{ConfigError, load_config, load_config_or_default};
pub use types::*;
pub use validate::validate_config;

#[derive(Debug, Clone, Parser, Default)]
pub struct CliOverrides {
    /// Override the public address placed in links
    #[arg(short, long)]
    pub address: Option<String>,
    /// Append remaining quota and expiry to link remarks
    #[arg(long)]
    pub show_info: Option<bool>,
    /// Override generated password length
    #[arg(long)]
    pub password_length: Option<usize>,
    /// Override log level (trace/debug/info/warn/error)
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) {
    if let Some(v) = &overrides.address {
        config.links.address = v.clone();
    }
    if let Some(v) = overrides.show_info {
        config.links.show_info = v;
    }
    if let Some(v) = overrides.password_length {
        config.clients.password_length = v;
    }
    if let Some(v) = &overrides.log_level {
        config.logging.level = Some(v.clone());
    }
}
