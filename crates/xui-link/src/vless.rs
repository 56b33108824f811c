//! `vless://` links.

use rand::Rng;
use xui_inbound::{Inbound, Protocol, Security};

use crate::encode::{Resolved, Target, encode_userinfo, render_uri, resolve, security_params, transport_params};
use crate::error::LinkError;
use crate::params::QueryParams;
use crate::remark::LinkContext;

/// Build the VLESS link for `email`, or an empty string when the inbound is
/// not VLESS or has no such client.
pub fn vless_link<R: Rng>(
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
    }) = resolve(inbound, &Protocol::Vless, email)?
    else {
        return Ok(String::new());
    };

    let mut params = QueryParams::new();
    params.set("type", stream.transport.network());
    if let Some(encryption) = &settings.encryption {
        params.set("encryption", encryption);
    }
    transport_params(&stream.transport, &mut params);
    security_params(&stream.security, &mut params, rng);
    if stream.transport.is_tcp()
        && matches!(stream.security, Security::Tls(_) | Security::Reality(_))
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
    let id = encode_userinfo(client.credential(&inbound.protocol));
    Ok(render_uri(&target, "vless", &id, &stream, &params))
}
