//! `trojan://` links.

use rand::Rng;
use xui_inbound::{Inbound, Protocol, Security};

use crate::encode::{Resolved, Target, encode_userinfo, render_uri, resolve, security_params, transport_params};
use crate::error::LinkError;
use crate::params::QueryParams;
use crate::remark::LinkContext;

/// Build the Trojan link for `email`, or an empty string when the inbound is
/// not Trojan or has no such client.
pub fn trojan_link<R: Rng>(
    inbound: &Inbound,
    address: &str,
    email: &str,
    ctx: &LinkContext,
    rng: &mut R,
) -> Result<String, LinkError> {
    let Some(Resolved { stream, client, .. }) = resolve(inbound, &Protocol::Trojan, email)? else {
        return Ok(String::new());
    };

    let mut params = QueryParams::new();
    params.set("type", stream.transport.network());
    transport_params(&stream.transport, &mut params);
    security_params(&stream.security, &mut params, rng);
    // trojan only negotiates flow under REALITY
    if stream.transport.is_tcp()
        && matches!(stream.security, Security::Reality(_))
        && let Some(flow) = client.flow()
    {
        params.set("flow", flow);
    }

    let target = Target {
        inbound,
        address,
        email,
        ctx,
    };
    let password = encode_userinfo(client.credential(&inbound.protocol));
    Ok(render_uri(&target, "trojan", &password, &stream, &params))
}
