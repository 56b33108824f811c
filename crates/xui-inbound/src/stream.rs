//! Typed view of the `streamSettings` blob.
//!
//! The blob is decoded into a transport variant, a security variant and the
//! external proxy pool. Every field is optional on the wire.

use serde_json::Value;

use crate::error::DecodeError;
use crate::field::{bool_or_false, non_empty, parse_blob, port_or_zero, str_list, str_or_empty};
use crate::search::{search_host, search_key};

static NULL: Value = Value::Null;

fn child<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&NULL)
}

/// `host` when set, otherwise the `Host` entry of the `headers` map.
fn host_or_header(settings: &Value) -> String {
    non_empty(settings.get("host")).unwrap_or_else(|| search_host(child(settings, "headers")))
}

/// Transport encapsulation, keyed by the `network` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    Tcp {
        header_type: String,
        /// Present only for the `http` header obfuscation.
        http: Option<HttpRequest>,
    },
    Kcp {
        header_type: String,
        seed: String,
    },
    WebSocket {
        path: String,
        host: String,
    },
    Grpc {
        service_name: String,
        authority: String,
        multi_mode: bool,
    },
    HttpUpgrade {
        path: String,
        host: String,
    },
    XHttp {
        path: String,
        host: String,
        mode: String,
    },
    /// Any other network tag, kept verbatim.
    Other(String),
}

/// Request line of the tcp `http` header disguise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpRequest {
    pub path: String,
    pub host: String,
}

impl Transport {
    fn parse(root: &Value) -> Self {
        let network = str_or_empty(root, "network");
        match network.as_str() {
            "tcp" => {
                let header = child(child(root, "tcpSettings"), "header");
                let header_type = str_or_empty(header, "type");
                let http = (header_type == "http").then(|| {
                    let request = child(header, "request");
                    HttpRequest {
                        path: str_list(request.get("path"))
                            .into_iter()
                            .next()
                            .unwrap_or_default(),
                        host: search_host(child(request, "headers")),
                    }
                });
                Self::Tcp { header_type, http }
            }
            "kcp" => {
                let kcp = child(root, "kcpSettings");
                Self::Kcp {
                    header_type: str_or_empty(child(kcp, "header"), "type"),
                    seed: str_or_empty(kcp, "seed"),
                }
            }
            "ws" => {
                let ws = child(root, "wsSettings");
                Self::WebSocket {
                    path: str_or_empty(ws, "path"),
                    host: host_or_header(ws),
                }
            }
            "grpc" => {
                let grpc = child(root, "grpcSettings");
                Self::Grpc {
                    service_name: str_or_empty(grpc, "serviceName"),
                    authority: str_or_empty(grpc, "authority"),
                    multi_mode: bool_or_false(grpc, "multiMode"),
                }
            }
            "httpupgrade" => {
                let upgrade = child(root, "httpupgradeSettings");
                Self::HttpUpgrade {
                    path: str_or_empty(upgrade, "path"),
                    host: host_or_header(upgrade),
                }
            }
            "xhttp" => {
                let xhttp = child(root, "xhttpSettings");
                Self::XHttp {
                    path: str_or_empty(xhttp, "path"),
                    host: host_or_header(xhttp),
                    mode: str_or_empty(xhttp, "mode"),
                }
            }
            _ => Self::Other(network),
        }
    }

    /// The `network` tag this variant was decoded from.
    pub fn network(&self) -> &str {
        match self {
            Self::Tcp { .. } => "tcp",
            Self::Kcp { .. } => "kcp",
            Self::WebSocket { .. } => "ws",
            Self::Grpc { .. } => "grpc",
            Self::HttpUpgrade { .. } => "httpupgrade",
            Self::XHttp { .. } => "xhttp",
            Self::Other(network) => network,
        }
    }

    pub fn is_tcp(&self) -> bool {
        matches!(self, Self::Tcp { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsSettings {
    pub alpn: Vec<String>,
    pub server_name: Option<String>,
    pub fingerprint: Option<String>,
    pub allow_insecure: Option<bool>,
}

impl TlsSettings {
    fn parse(tls: &Value) -> Self {
        // fingerprint and allowInsecure live under the nested client settings
        let inner = search_key(tls, "settings").unwrap_or(&NULL);
        Self {
            alpn: str_list(tls.get("alpn")),
            server_name: non_empty(search_key(tls, "serverName")),
            fingerprint: non_empty(search_key(inner, "fingerprint")),
            allow_insecure: search_key(inner, "allowInsecure").and_then(Value::as_bool),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RealitySettings {
    /// Pool the advertised server name is drawn from.
    pub server_names: Vec<String>,
    /// Pool the advertised short id is drawn from.
    pub short_ids: Vec<String>,
    pub public_key: Option<String>,
    pub fingerprint: Option<String>,
    /// Post-quantum verification key.
    pub mldsa65_verify: Option<String>,
}

impl RealitySettings {
    fn parse(reality: &Value) -> Self {
        let inner = search_key(reality, "settings").unwrap_or(&NULL);
        Self {
            server_names: str_list(search_key(reality, "serverNames")),
            short_ids: str_list(search_key(reality, "shortIds")),
            public_key: non_empty(search_key(inner, "publicKey")),
            fingerprint: non_empty(search_key(inner, "fingerprint")),
            mldsa65_verify: non_empty(search_key(inner, "mldsa65Verify")),
        }
    }
}

/// Security layer, keyed by the `security` tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Security {
    /// Anything other than `tls` or `reality`.
    #[default]
    None,
    Tls(TlsSettings),
    Reality(RealitySettings),
}

impl Security {
    fn parse(root: &Value) -> Self {
        match root.get("security").and_then(Value::as_str) {
            Some("tls") => Self::Tls(TlsSettings::parse(child(root, "tlsSettings"))),
            Some("reality") => Self::Reality(RealitySettings::parse(child(root, "realitySettings"))),
            _ => Self::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Tls(_) => "tls",
            Self::Reality(_) => "reality",
        }
    }
}

/// Security override carried by an external proxy entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ForceTls {
    /// Drop the TLS parameters and advertise `security=none`.
    None,
    /// Keep the inbound's own security.
    #[default]
    Same,
    /// Advertise this security tag instead, keeping all parameters.
    Explicit(String),
}

impl From<&str> for ForceTls {
    fn from(value: &str) -> Self {
        match value {
            "none" => Self::None,
            "same" | "" => Self::Same,
            other => Self::Explicit(other.to_string()),
        }
    }
}

/// Alternate endpoint advertised instead of the inbound's own address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalProxy {
    pub force_tls: ForceTls,
    pub dest: String,
    pub port: u16,
    /// Suffix appended to the link remark.
    pub remark: String,
}

impl ExternalProxy {
    fn parse(entry: &Value) -> Self {
        Self {
            force_tls: ForceTls::from(entry.get("forceTls").and_then(Value::as_str).unwrap_or_default()),
            dest: str_or_empty(entry, "dest"),
            port: port_or_zero(entry, "port"),
            remark: str_or_empty(entry, "remark"),
        }
    }
}

/// Decoded `streamSettings` blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSettings {
    pub transport: Transport,
    pub security: Security,
    /// When non-empty, links fan out to these endpoints in order.
    pub external_proxies: Vec<ExternalProxy>,
}

impl StreamSettings {
    /// Decode the blob. Only syntactically invalid JSON is an error.
    pub fn parse(raw: &str) -> Result<Self, DecodeError> {
        let root = parse_blob(raw).map_err(DecodeError::StreamSettings)?;
        let external_proxies = root
            .get("externalProxy")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().map(ExternalProxy::parse).collect())
            .unwrap_or_default();
        Ok(Self {
            transport: Transport::parse(&root),
            security: Security::parse(&root),
            external_proxies,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: Value) -> StreamSettings {
        StreamSettings::parse(&value.to_string()).unwrap()
    }

    #[test]
    fn websocket_host_falls_back_to_headers() {
        let stream = parse(json!({
            "network": "ws",
            "wsSettings": { "path": "/ws", "host": "", "headers": { "HOST": ["cdn.example.com", "b"] } }
        }));
        assert_eq!(
            stream.transport,
            Transport::WebSocket {
                path: "/ws".into(),
                host: "cdn.example.com".into()
            }
        );
        assert_eq!(stream.security, Security::None);
        assert!(stream.external_proxies.is_empty());
    }

    #[test]
    fn tcp_http_header_request() {
        let stream = parse(json!({
            "network": "tcp",
            "tcpSettings": { "header": { "type": "http", "request": {
                "path": ["/a", "/b"],
                "headers": { "Host": "example.com" }
            }}}
        }));
        let Transport::Tcp { header_type, http } = stream.transport else {
            panic!("expected tcp");
        };
        assert_eq!(header_type, "http");
        assert_eq!(
            http,
            Some(HttpRequest {
                path: "/a".into(),
                host: "example.com".into()
            })
        );
    }

    #[test]
    fn tcp_http_header_without_request_defaults() {
        let stream = parse(json!({
            "network": "tcp",
            "tcpSettings": { "header": { "type": "http" } }
        }));
        assert_eq!(
            stream.transport,
            Transport::Tcp {
                header_type: "http".into(),
                http: Some(HttpRequest::default())
            }
        );
    }

    #[test]
    fn grpc_and_unknown_network() {
        let stream = parse(json!({
            "network": "grpc",
            "grpcSettings": { "serviceName": "svc", "multiMode": true }
        }));
        assert_eq!(
            stream.transport,
            Transport::Grpc {
                service_name: "svc".into(),
                authority: String::new(),
                multi_mode: true
            }
        );
        assert_eq!(parse(json!({ "network": "quic" })).transport.network(), "quic");
        assert_eq!(parse(json!({})).transport, Transport::Other(String::new()));
    }

    #[test]
    fn tls_fields_are_searched_in_nested_settings() {
        let stream = parse(json!({
            "network": "tcp",
            "security": "tls",
            "tlsSettings": {
                "serverName": "example.com",
                "alpn": ["h2", "http/1.1"],
                "settings": { "fingerprint": "chrome", "allowInsecure": false }
            }
        }));
        let Security::Tls(tls) = stream.security else {
            panic!("expected tls");
        };
        assert_eq!(tls.alpn, ["h2", "http/1.1"]);
        assert_eq!(tls.server_name.as_deref(), Some("example.com"));
        assert_eq!(tls.fingerprint.as_deref(), Some("chrome"));
        assert_eq!(tls.allow_insecure, Some(false));
    }

    #[test]
    fn reality_pools_and_keys() {
        let stream = parse(json!({
            "network": "tcp",
            "security": "reality",
            "realitySettings": {
                "serverNames": ["a.com", "b.com"],
                "shortIds": ["01", "ab"],
                "settings": { "publicKey": "PBK", "fingerprint": "", "mldsa65Verify": "PQV" }
            }
        }));
        let Security::Reality(reality) = stream.security else {
            panic!("expected reality");
        };
        assert_eq!(reality.server_names, ["a.com", "b.com"]);
        assert_eq!(reality.short_ids, ["01", "ab"]);
        assert_eq!(reality.public_key.as_deref(), Some("PBK"));
        assert_eq!(reality.fingerprint, None);
        assert_eq!(reality.mldsa65_verify.as_deref(), Some("PQV"));
    }

    #[test]
    fn external_proxy_ports_are_coerced() {
        let stream = parse(json!({
            "network": "ws",
            "externalProxy": [
                { "forceTls": "none", "dest": "a.example", "port": 8443.0, "remark": "A" },
                { "forceTls": "same", "dest": "b.example", "port": 443 },
                { "forceTls": "tls", "dest": "c.example", "port": "2053" },
                "garbage"
            ]
        }));
        let proxies = stream.external_proxies;
        assert_eq!(proxies.len(), 4);
        assert_eq!(proxies[0].force_tls, ForceTls::None);
        assert_eq!(proxies[0].port, 8443);
        assert_eq!(proxies[1].force_tls, ForceTls::Same);
        assert_eq!(proxies[2].force_tls, ForceTls::Explicit("tls".into()));
        assert_eq!(proxies[2].port, 2053);
        assert_eq!(proxies[3], ExternalProxy::default());
    }

    #[test]
    fn malformed_stream_settings_is_an_error() {
        let err = StreamSettings::parse("{\"network\":").unwrap_err();
        assert!(matches!(err, DecodeError::StreamSettings(_)));
    }
}
