//! Subscription output: every link of a subscription group.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use tracing::debug;
use xui_inbound::{Inbound, InboundSettings};

use crate::client_link;
use crate::error::LinkError;
use crate::remark::LinkContext;

/// Links of every enabled client whose `subId` is `sub_id`, across enabled
/// inbounds in order. Fan-out links are flattened into separate entries.
pub fn build_subscription<R: Rng>(
    inbounds: &[Inbound],
    sub_id: &str,
    address: &str,
    ctx: &LinkContext,
    rng: &mut R,
) -> Result<Vec<String>, LinkError> {
    let mut links = Vec::new();
    for inbound in inbounds.iter().filter(|inbound| inbound.enable) {
        let settings = InboundSettings::parse(&inbound.settings)?;
        for client in settings
            .clients
            .iter()
            .filter(|client| client.enable && client.sub_id == sub_id)
        {
            let link = client_link(inbound, address, &client.email, ctx, rng)?;
            links.extend(link.lines().map(str::to_string));
        }
    }
    debug!(sub_id = %sub_id, count = links.len(), "subscription built");
    Ok(links)
}

/// [`build_subscription`] joined by newlines and base64 encoded.
pub fn build_subscription_base64<R: Rng>(
    inbounds: &[Inbound],
    sub_id: &str,
    address: &str,
    ctx: &LinkContext,
    rng: &mut R,
) -> Result<String, LinkError> {
    let links = build_subscription(inbounds, sub_id, address, ctx, rng)?;
    Ok(STANDARD.encode(links.join("\n")))
}
