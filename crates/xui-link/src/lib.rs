//! Share-link encoders for xray inbounds.
//!
//! Given an [`Inbound`] and a client email, the encoders produce the
//! connection links consumed by client applications:
//!
//! - [`vmess_link`] - base64 of a JSON object behind `vmess://`
//! - [`vless_link`] - `vless://<uuid>@host:port?query#remark`
//! - [`trojan_link`] - `trojan://<password>@host:port?query#remark`
//! - [`shadowsocks_link`] - `ss://<base64 credential>@host:port?query#remark`
//!
//! An inbound with external proxies yields one link per proxy, joined by
//! newlines. A protocol mismatch or an unknown email yields an empty string.
//! Randomness (REALITY pools, spider paths, generated credentials) comes
//! from the caller's [`rand::Rng`].

pub mod cli;
mod encode;
mod error;
pub mod format;
mod generate;
mod params;
mod remark;
mod shadowsocks;
mod subscription;
mod trojan;
mod vless;
mod vmess;

use rand::Rng;
use tracing::debug;
use xui_inbound::{Inbound, Protocol};

pub use error::LinkError;
pub use generate::{
    ClientGenerator, ClientLink, NewClient, add_client_with_link, generate_client_defaults,
    random_string, random_uuid, strip_port,
};
pub use params::QueryParams;
pub use remark::{DISABLED_MARKER, LinkContext, build_remark, unix_now};
pub use shadowsocks::{shadowsocks_credential, shadowsocks_link};
pub use subscription::{build_subscription, build_subscription_base64};
pub use trojan::trojan_link;
pub use vless::vless_link;
pub use vmess::vmess_link;

/// Build the link for `email` with the encoder matching the inbound's protocol.
///
/// Protocols without a link format yield an empty string.
pub fn client_link<R: Rng>(
    inbound: &Inbound,
    address: &str,
    email: &str,
    ctx: &LinkContext,
    rng: &mut R,
) -> Result<String, LinkError> {
    match inbound.protocol {
        Protocol::Vmess => vmess_link(inbound, address, email, ctx, rng),
        Protocol::Vless => vless_link(inbound, address, email, ctx, rng),
        Protocol::Trojan => trojan_link(inbound, address, email, ctx, rng),
        Protocol::Shadowsocks => shadowsocks_link(inbound, address, email, ctx, rng),
        Protocol::Other(ref tag) => {
            debug!(inbound = inbound.id, protocol = %tag, "no link format for protocol");
            Ok(String::new())
        }
    }
}
