//! Decoding and editing of the per-inbound `settings` blob.

use serde_json::Value;
use tracing::debug;

use crate::client::ClientRecord;
use crate::error::DecodeError;
use crate::field::{opt_str, parse_blob, str_or_empty};

/// Decoded `settings` blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundSettings {
    pub clients: Vec<ClientRecord>,
    /// Shadowsocks cipher method.
    pub method: String,
    /// Shadowsocks inbound-level secret.
    pub password: String,
    /// VLESS encryption setting, when present.
    pub encryption: Option<String>,
}

impl InboundSettings {
    /// Decode the blob. Only syntactically invalid JSON is an error.
    pub fn parse(raw: &str) -> Result<Self, DecodeError> {
        let root = parse_blob(raw).map_err(DecodeError::Settings)?;
        let clients = root
            .get("clients")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(ClientRecord::from_value).collect())
            .unwrap_or_default();
        Ok(Self {
            clients,
            method: str_or_empty(&root, "method"),
            password: str_or_empty(&root, "password"),
            encryption: opt_str(&root, "encryption"),
        })
    }

    /// The first client with this exact email.
    pub fn client(&self, email: &str) -> Option<&ClientRecord> {
        crate::find_client(&self.clients, email).map(|i| &self.clients[i])
    }
}

/// Append `client` to the `clients` array of `raw`, keeping every other key
/// and its value.
///
/// The blob is re-serialized pretty-printed with its keys in sorted order;
/// the original key order is not kept. A missing or mistyped `clients` field
/// is replaced by a one-element array.
pub fn append_client(raw: &str, client: &ClientRecord) -> Result<String, DecodeError> {
    let mut map = match parse_blob(raw).map_err(DecodeError::Settings)? {
        Value::Object(map) => map,
        _ => Default::default(),
    };
    let encoded = serde_json::to_value(client).map_err(DecodeError::Settings)?;
    match map.get_mut("clients") {
        Some(Value::Array(items)) => items.push(encoded),
        _ => {
            debug!("settings had no clients array, creating one");
            map.insert("clients".to_string(), Value::Array(vec![encoded]));
        }
    }
    serde_json::to_string_pretty(&Value::Object(map)).map_err(DecodeError::Settings)
}
