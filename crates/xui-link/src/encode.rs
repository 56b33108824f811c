//! Pipeline shared by the URI-style encoders.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use tracing::{debug, warn};
use xui_core::SPIDER_PATH_LENGTH;
use xui_inbound::{
    ClientRecord, ForceTls, Inbound, InboundSettings, Protocol, Security, StreamSettings, Transport,
};

use crate::error::LinkError;
use crate::params::{QueryParams, TLS_KEYS};
use crate::remark::{LinkContext, build_remark};

/// Characters escaped in a link fragment.
const FRAGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Characters escaped in the credential before `@`.
const USERINFO: &AsciiSet = &FRAGMENT.add(b'/').add(b':').add(b'?').add(b'@');

/// Decoded inputs of one encoder call.
pub(crate) struct Resolved {
    pub stream: StreamSettings,
    pub settings: InboundSettings,
    pub client: ClientRecord,
}

/// Decode both blobs and locate `email`.
///
/// `Ok(None)` when the inbound speaks another protocol or has no such client.
pub(crate) fn resolve(
    inbound: &Inbound,
    expected: &Protocol,
    email: &str,
) -> Result<Option<Resolved>, LinkError> {
    if &inbound.protocol != expected {
        debug!(
            inbound = inbound.id,
            protocol = %inbound.protocol,
            expected = %expected,
            "protocol mismatch, no link"
        );
        return Ok(None);
    }
    let stream = StreamSettings::parse(&inbound.stream_settings).inspect_err(|e| {
        warn!(inbound = inbound.id, error = %e, kind = e.error_kind(), "failed to decode stream settings");
    })?;
    let settings = InboundSettings::parse(&inbound.settings).inspect_err(|e| {
        warn!(inbound = inbound.id, error = %e, kind = e.error_kind(), "failed to decode settings");
    })?;
    let Some(client) = settings.client(email).cloned() else {
        debug!(inbound = inbound.id, email = %email, "client not found, no link");
        return Ok(None);
    };
    Ok(Some(Resolved {
        stream,
        settings,
        client,
    }))
}

/// Append the transport keys for URI links.
pub(crate) fn transport_params(transport: &Transport, params: &mut QueryParams) {
    match transport {
        Transport::Tcp { http, .. } => {
            if let Some(request) = http {
                params.set("path", &request.path);
                params.set("host", &request.host);
                params.set("headerType", "http");
            }
        }
        Transport::Kcp { header_type, seed } => {
            params.set("headerType", header_type);
            params.set("seed", seed);
        }
        Transport::WebSocket { path, host } | Transport::HttpUpgrade { path, host } => {
            params.set("path", path);
            params.set("host", host);
        }
        Transport::Grpc {
            service_name,
            authority,
            multi_mode,
        } => {
            params.set("serviceName", service_name);
            params.set("authority", authority);
            if *multi_mode {
                params.set("mode", "multi");
            }
        }
        Transport::XHttp { path, host, mode } => {
            params.set("path", path);
            params.set("host", host);
            params.set("mode", mode);
        }
        Transport::Other(_) => {}
    }
}

/// Append `security` and its keys for URI links.
///
/// REALITY draws the advertised server name and short id from their pools
/// and generates a fresh spider path.
pub(crate) fn security_params<R: Rng>(security: &Security, params: &mut QueryParams, rng: &mut R) {
    params.set("security", security.as_str());
    match security {
        Security::Tls(tls) => {
            if !tls.alpn.is_empty() {
                params.set("alpn", tls.alpn.join(","));
            }
            if let Some(sni) = &tls.server_name {
                params.set("sni", sni);
            }
            if let Some(fp) = &tls.fingerprint {
                params.set("fp", fp);
            }
            if tls.allow_insecure == Some(true) {
                params.set("allowInsecure", "1");
            }
        }
        Security::Reality(reality) => {
            if let Some(sni) = reality.server_names.choose(rng) {
                params.set("sni", sni);
            }
            if let Some(pbk) = &reality.public_key {
                params.set("pbk", pbk);
            }
            if let Some(sid) = reality.short_ids.choose(rng) {
                params.set("sid", sid);
            }
            if let Some(fp) = &reality.fingerprint {
                params.set("fp", fp);
            }
            if let Some(pqv) = &reality.mldsa65_verify {
                params.set("pqv", pqv);
            }
            params.set("spx", spider_path(rng));
        }
        Security::None => {}
    }
}

/// `/` followed by random alphanumerics.
pub(crate) fn spider_path<R: Rng>(rng: &mut R) -> String {
    let suffix: String = (0..SPIDER_PATH_LENGTH)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect();
    format!("/{}", suffix)
}

/// `host:port`, bracketing bare IPv6 literals.
pub(crate) fn host_port(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}

/// Percent-encode a credential for the userinfo position.
pub(crate) fn encode_userinfo(credential: &str) -> String {
    utf8_percent_encode(credential, USERINFO).to_string()
}

/// `scheme://credential@host:port?query#remark`; the credential must already be encoded.
pub(crate) fn format_uri(
    scheme: &str,
    credential: &str,
    host: &str,
    port: u16,
    params: &QueryParams,
    remark: &str,
) -> String {
    let mut link = format!("{}://{}@{}", scheme, credential, host_port(host, port));
    if !params.is_empty() {
        link.push('?');
        link.push_str(&params.encode());
    }
    if !remark.is_empty() {
        link.push('#');
        link.push_str(&utf8_percent_encode(remark, FRAGMENT).to_string());
    }
    link
}

/// Where a link points and how its remark is rendered.
pub(crate) struct Target<'a> {
    pub inbound: &'a Inbound,
    pub address: &'a str,
    pub email: &'a str,
    pub ctx: &'a LinkContext,
}

impl Target<'_> {
    pub fn remark(&self, extra: &str) -> String {
        build_remark(self.inbound, self.email, extra, self.ctx)
    }
}

/// Render one link to the target address, or one link per external proxy
/// joined by newlines.
pub(crate) fn render_uri(
    target: &Target<'_>,
    scheme: &str,
    credential: &str,
    stream: &StreamSettings,
    params: &QueryParams,
) -> String {
    if stream.external_proxies.is_empty() {
        return format_uri(
            scheme,
            credential,
            target.address,
            target.inbound.port,
            params,
            &target.remark(""),
        );
    }

    stream
        .external_proxies
        .iter()
        .map(|proxy| {
            let mut params = params.clone();
            match &proxy.force_tls {
                ForceTls::None => {
                    params.set("security", "none");
                    for key in TLS_KEYS {
                        params.remove(key);
                    }
                }
                ForceTls::Same => {}
                ForceTls::Explicit(security) => params.set("security", security),
            }
            let remark = target.remark(&proxy.remark);
            format_uri(scheme, credential, &proxy.dest, proxy.port, &params, &remark)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
