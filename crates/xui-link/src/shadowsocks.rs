//! `ss://` links.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use xui_inbound::{Inbound, Protocol};

use crate::encode::{Resolved, Target, render_uri, resolve, security_params, transport_params};
use crate::error::LinkError;
use crate::params::QueryParams;
use crate::remark::LinkContext;

/// `method:[inbound_password:]client_password`.
///
/// The inbound password only takes part for the 2022 AEAD methods, which all
/// start with `2`.
pub fn shadowsocks_credential(method: &str, inbound_password: &str, client_password: &str) -> String {
    if method.starts_with('2') {
        format!("{}:{}:{}", method, inbound_password, client_password)
    } else {
        format!("{}:{}", method, client_password)
    }
}

/// Build the Shadowsocks link for `email`, or an empty string when the
/// inbound is not Shadowsocks or has no such client.
pub fn shadowsocks_link<R: Rng>(
    inbound: &Inbound,
    address: &str,
    email: &str,
    ctx: &LinkContext,
    rng: &mut R,
) -> Result<String, LinkError> {
    let Some(Resolved {
        stream,
        settings,
        client,
    }) = resolve(inbound, &Protocol::Shadowsocks, email)?
    else {
        return Ok(String::new());
    };

    let mut params = QueryParams::new();
    params.set("type", stream.transport.network());
    transport_params(&stream.transport, &mut params);
    security_params(&stream.security, &mut params, rng);

    let credential = shadowsocks_credential(
        &settings.method,
        &settings.password,
        client.credential(&inbound.protocol),
    );
    let target = Target {
        inbound,
        address,
        email,
        ctx,
    };
    Ok(render_uri(
        &target,
        "ss",
        &STANDARD.encode(credential),
        &stream,
        &params,
    ))
}
