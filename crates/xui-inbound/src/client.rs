//! Client records and lookup by email.

use serde::Serialize;
use serde_json::Value;

use crate::field::{as_int, bool_or_false, int_or_zero, opt_str, str_or_empty};
use crate::model::Protocol;

/// One addressable identity inside an inbound's settings.
///
/// Field names on the wire follow the panel's settings schema. Protocol
/// specific fields are omitted from the serialized form when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientRecord {
    /// UUID for vmess/vless.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// VMess cipher.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<String>,
    #[serde(rename = "alterId", skip_serializing_if = "Option::is_none")]
    pub alter_id: Option<i64>,
    /// Shared secret for trojan/shadowsocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Flow control tag (vless, trojan).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    pub email: String,
    #[serde(rename = "limitIp")]
    pub limit_ip: i64,
    /// Quota in bytes, despite the wire name.
    #[serde(rename = "totalGB")]
    pub total_bytes: i64,
    /// Expiry in unix milliseconds (0 = never).
    #[serde(rename = "expiryTime")]
    pub expiry_time: i64,
    pub enable: bool,
    #[serde(rename = "tgId")]
    pub tg_id: i64,
    #[serde(rename = "subId")]
    pub sub_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
    pub reset: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ClientRecord {
    /// Decode a client object, defaulting every absent or mistyped field.
    pub fn from_value(value: &Value) -> Self {
        Self {
            id: opt_str(value, "id"),
            security: opt_str(value, "security"),
            alter_id: value.get("alterId").map(as_int),
            password: opt_str(value, "password"),
            flow: opt_str(value, "flow"),
            email: str_or_empty(value, "email"),
            limit_ip: int_or_zero(value, "limitIp"),
            total_bytes: int_or_zero(value, "totalGB"),
            expiry_time: int_or_zero(value, "expiryTime"),
            enable: bool_or_false(value, "enable"),
            tg_id: int_or_zero(value, "tgId"),
            sub_id: str_or_empty(value, "subId"),
            comment: str_or_empty(value, "comment"),
            reset: int_or_zero(value, "reset"),
            created_at: int_or_zero(value, "created_at"),
            updated_at: int_or_zero(value, "updated_at"),
        }
    }

    /// The bearer credential for `protocol`: the UUID or the password.
    pub fn credential(&self, protocol: &Protocol) -> &str {
        let credential = if protocol.uses_uuid() {
            &self.id
        } else {
            &self.password
        };
        credential.as_deref().unwrap_or_default()
    }

    /// Flow tag, if set and non-empty.
    pub fn flow(&self) -> Option<&str> {
        self.flow.as_deref().filter(|flow| !flow.is_empty())
    }
}

/// Index of the first client whose email equals `email` exactly.
pub fn find_client(clients: &[ClientRecord], email: &str) -> Option<usize> {
    clients.iter().position(|client| client.email == email)
}
