//! Configuration validation logic.

use xui_core::defaults::{
    MAX_PASSWORD_LENGTH, MAX_SUB_ID_LENGTH, MIN_PASSWORD_LENGTH, MIN_SUB_ID_LENGTH,
};

use crate::Config;
use crate::loader::ConfigError;

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.links.address.trim().is_empty() {
        return Err(ConfigError::Validation("links.address is empty".into()));
    }
    if config.links.remark_separator.is_empty() {
        return Err(ConfigError::Validation(
            "links.remark_separator is empty".into(),
        ));
    }
    let password_length = config.clients.password_length;
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&password_length) {
        return Err(ConfigError::Validation(format!(
            "clients.password_length must be {}..={}",
            MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
        )));
    }
    let sub_id_length = config.clients.sub_id_length;
    if !(MIN_SUB_ID_LENGTH..=MAX_SUB_ID_LENGTH).contains(&sub_id_length) {
        return Err(ConfigError::Validation(format!(
            "clients.sub_id_length must be {}..={}",
            MIN_SUB_ID_LENGTH, MAX_SUB_ID_LENGTH
        )));
    }
    let valid_formats = ["json", "pretty", "compact"];
    if let Some(format) = config.logging.format.as_deref()
        && !valid_formats.contains(&format)
    {
        return Err(ConfigError::Validation(format!(
            "logging.format must be one of: {:?}",
            valid_formats
        )));
    }
    let valid_outputs = ["stdout", "stderr"];
    if let Some(output) = config.logging.output.as_deref()
        && !valid_outputs.contains(&output)
    {
        return Err(ConfigError::Validation(format!(
            "logging.output must be one of: {:?}",
            valid_outputs
        )));
    }
    Ok(())
}
