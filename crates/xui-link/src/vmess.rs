//! `vmess://` links: a JSON object, pretty printed and base64 encoded.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::{Map, Value, json};
use xui_core::VMESS_LINK_VERSION;
use xui_inbound::{ForceTls, Inbound, Protocol, Security, Transport};

use crate::encode::{Resolved, Target, resolve, spider_path};
use crate::error::LinkError;
use crate::params::TLS_KEYS;
use crate::remark::LinkContext;

type Object = Map<String, Value>;

fn transport_fields(transport: &Transport, obj: &mut Object) {
    match transport {
        Transport::Tcp { header_type, http } => {
            if !header_type.is_empty() {
                obj.insert("type".into(), json!(header_type));
            }
            if let Some(request) = http {
                obj.insert("path".into(), json!(request.path));
                obj.insert("host".into(), json!(request.host));
            }
        }
        Transport::Kcp { header_type, seed } => {
            obj.insert("type".into(), json!(header_type));
            obj.insert("path".into(), json!(seed));
        }
        Transport::WebSocket { path, host } | Transport::HttpUpgrade { path, host } => {
            obj.insert("path".into(), json!(path));
            obj.insert("host".into(), json!(host));
        }
        Transport::Grpc {
            service_name,
            authority,
            multi_mode,
        } => {
            obj.insert("path".into(), json!(service_name));
            obj.insert("authority".into(), json!(authority));
            if *multi_mode {
                obj.insert("type".into(), json!("multi"));
            }
        }
        Transport::XHttp { path, host, mode } => {
            obj.insert("path".into(), json!(path));
            obj.insert("host".into(), json!(host));
            obj.insert("mode".into(), json!(mode));
        }
        Transport::Other(_) => {}
    }
}

fn security_fields<R: Rng>(security: &Security, obj: &mut Object, rng: &mut R) {
    obj.insert("tls".into(), json!(security.as_str()));
    match security {
        Security::Tls(tls) => {
            if !tls.alpn.is_empty() {
                obj.insert("alpn".into(), json!(tls.alpn.join(",")));
            }
            if let Some(sni) = &tls.server_name {
                obj.insert("sni".into(), json!(sni));
            }
            if let Some(fp) = &tls.fingerprint {
                obj.insert("fp".into(), json!(fp));
            }
            if let Some(insecure) = tls.allow_insecure {
                obj.insert("allowInsecure".into(), json!(insecure));
            }
        }
        Security::Reality(reality) => {
            if let Some(sni) = reality.server_names.choose(rng) {
                obj.insert("sni".into(), json!(sni));
            }
            if let Some(pbk) = &reality.public_key {
                obj.insert("pbk".into(), json!(pbk));
            }
            if let Some(sid) = reality.short_ids.choose(rng) {
                obj.insert("sid".into(), json!(sid));
            }
            if let Some(fp) = &reality.fingerprint {
                obj.insert("fp".into(), json!(fp));
            }
            if let Some(pqv) = &reality.mldsa65_verify {
                obj.insert("pqv".into(), json!(pqv));
            }
            obj.insert("spx".into(), json!(spider_path(rng)));
        }
        Security::None => {}
    }
}

/// `vmess://` + base64 of the two-space indented JSON object.
fn encode_object(obj: Object) -> String {
    let pretty = format!("{:#}", Value::Object(obj));
    format!("vmess://{}", STANDARD.encode(pretty))
}

/// Build the VMess link for `email`, or an empty string when the inbound is
/// not VMess or has no such client.
pub fn vmess_link<R: Rng>(
    inbound: &Inbound,
    address: &str,
    email: &str,
    ctx: &LinkContext,
    rng: &mut R,
) -> Result<String, LinkError> {
    let Some(Resolved { stream, client, .. }) = resolve(inbound, &Protocol::Vmess, email)? else {
        return Ok(String::new());
    };

    let mut obj = Object::new();
    obj.insert("v".into(), json!(VMESS_LINK_VERSION));
    obj.insert("add".into(), json!(address));
    obj.insert("port".into(), json!(inbound.port));
    obj.insert("type".into(), json!("none"));
    obj.insert("net".into(), json!(stream.transport.network()));
    transport_fields(&stream.transport, &mut obj);
    security_fields(&stream.security, &mut obj, rng);
    obj.insert("id".into(), json!(client.credential(&inbound.protocol)));
    obj.insert("scy".into(), json!(client.security.as_deref().unwrap_or_default()));

    let target = Target {
        inbound,
        address,
        email,
        ctx,
    };
    if stream.external_proxies.is_empty() {
        obj.insert("ps".into(), json!(target.remark("")));
        return Ok(encode_object(obj));
    }

    let links: Vec<String> = stream
        .external_proxies
        .iter()
        .map(|proxy| {
            let mut obj = obj.clone();
            match &proxy.force_tls {
                ForceTls::None => {
                    for key in TLS_KEYS {
                        obj.remove(key);
                    }
                    obj.insert("tls".into(), json!("none"));
                }
                ForceTls::Same => {}
                ForceTls::Explicit(security) => {
                    obj.insert("tls".into(), json!(security));
                }
            }
            obj.insert("ps".into(), json!(target.remark(&proxy.remark)));
            obj.insert("add".into(), json!(proxy.dest));
            obj.insert("port".into(), json!(proxy.port));
            encode_object(obj)
        })
        .collect();
    Ok(links.join("\n"))
}
