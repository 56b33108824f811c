//! Persisted inbound and traffic records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Inbound protocol tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Protocol {
    Vmess,
    Vless,
    Trojan,
    Shadowsocks,
    /// Any other tag (socks, http, wireguard, ...). No links are produced for these.
    Other(String),
}

impl Protocol {
    pub fn as_str(&self) -> &str {
        match self {
            Protocol::Vmess => "vmess",
            Protocol::Vless => "vless",
            Protocol::Trojan => "trojan",
            Protocol::Shadowsocks => "shadowsocks",
            Protocol::Other(tag) => tag,
        }
    }

    /// Whether clients of this protocol authenticate with a UUID rather than a password.
    pub fn uses_uuid(&self) -> bool {
        matches!(self, Protocol::Vmess | Protocol::Vless)
    }
}

impl From<&str> for Protocol {
    fn from(tag: &str) -> Self {
        match tag {
            "vmess" => Protocol::Vmess,
            "vless" => Protocol::Vless,
            "trojan" => Protocol::Trojan,
            "shadowsocks" => Protocol::Shadowsocks,
            other => Protocol::Other(other.to_string()),
        }
    }
}

impl From<String> for Protocol {
    fn from(tag: String) -> Self {
        Protocol::from(tag.as_str())
    }
}

impl From<Protocol> for String {
    fn from(protocol: Protocol) -> Self {
        protocol.as_str().to_string()
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A traffic-forwarding rule as stored by the panel.
///
/// `settings` and `stream_settings` are kept as raw JSON text and decoded on
/// every use; see [`InboundSettings`](crate::InboundSettings) and
/// [`StreamSettings`](crate::StreamSettings).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inbound {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub remark: String,
    #[serde(default = "default_enable")]
    pub enable: bool,
    #[serde(default)]
    pub listen: String,
    pub port: u16,
    pub protocol: Protocol,
    #[serde(default)]
    pub settings: String,
    #[serde(default)]
    pub stream_settings: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub client_stats: Vec<ClientTraffic>,
}

fn default_enable() -> bool {
    true
}

impl Inbound {
    /// Create an enabled inbound with empty settings blobs.
    pub fn new(protocol: Protocol, port: u16) -> Self {
        Self {
            id: 0,
            remark: String::new(),
            enable: true,
            listen: String::new(),
            port,
            protocol,
            settings: String::new(),
            stream_settings: String::new(),
            tag: String::new(),
            client_stats: Vec::new(),
        }
    }

    /// Traffic counters for `email`, if the panel has recorded any.
    pub fn client_traffic(&self, email: &str) -> Option<&ClientTraffic> {
        self.client_stats.iter().find(|stat| stat.email == email)
    }
}

/// Per-client traffic counters maintained by the proxy engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientTraffic {
    pub id: i64,
    pub inbound_id: i64,
    pub enable: bool,
    pub email: String,
    pub up: i64,
    pub down: i64,
    /// Expiry in unix milliseconds; negative values are a duration counted from first use.
    pub expiry_time: i64,
    /// Quota in bytes (0 = unlimited).
    pub total: i64,
    pub reset: i64,
}

impl ClientTraffic {
    /// Bytes left before the quota is exhausted; `None` when unlimited.
    pub fn remaining(&self) -> Option<i64> {
        (self.total > 0).then(|| self.total.saturating_sub(self.up.saturating_add(self.down)))
    }
}
