//! Default client generation and the create-and-link workflow.

use rand::distributions::Alphanumeric;
use rand::{CryptoRng, Rng};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use xui_config::ClientsConfig;
use xui_core::{BYTES_PER_GB, DEFAULT_PASSWORD_LENGTH, DEFAULT_SUB_ID_LENGTH, DEFAULT_VMESS_SECURITY};
use xui_inbound::{ClientRecord, Inbound, InboundSettings, Protocol, append_client};

use crate::error::LinkError;
use crate::remark::{LinkContext, unix_now};

/// Caller-supplied fields of a new client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewClient {
    pub email: String,
    /// Quota in gigabytes (0 = unlimited).
    pub total_gb: i64,
    /// Expiry in unix milliseconds (0 = never).
    pub expiry_time: i64,
    pub limit_ip: i64,
    pub tg_id: i64,
    pub sub_id: String,
}

impl NewClient {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }
}

/// Random alphanumeric string of `len` characters.
pub fn random_string<R: Rng + CryptoRng>(rng: &mut R, len: usize) -> String {
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

/// Random version 4 UUID drawn from `rng`.
pub fn random_uuid<R: Rng + CryptoRng>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.r#gen()).into_uuid()
}

/// Builds client records with configured credential lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientGenerator {
    password_length: usize,
    sub_id_length: usize,
}

impl Default for ClientGenerator {
    fn default() -> Self {
        Self {
            password_length: DEFAULT_PASSWORD_LENGTH,
            sub_id_length: DEFAULT_SUB_ID_LENGTH,
        }
    }
}

impl ClientGenerator {
    pub fn from_config(config: &ClientsConfig) -> Self {
        Self {
            password_length: config.password_length,
            sub_id_length: config.sub_id_length,
        }
    }

    /// A fully populated, enabled client for `protocol`.
    ///
    /// VMess and VLESS clients get a fresh UUID, Trojan and Shadowsocks
    /// clients a fresh password. Quota is converted from gigabytes to bytes
    /// and both timestamps are set to `now_ms`.
    pub fn generate<R: Rng + CryptoRng>(
        &self,
        protocol: &Protocol,
        request: &NewClient,
        now_ms: i64,
        rng: &mut R,
    ) -> Result<ClientRecord, LinkError> {
        let mut client = ClientRecord {
            email: request.email.clone(),
            enable: true,
            limit_ip: request.limit_ip,
            total_bytes: request.total_gb.saturating_mul(BYTES_PER_GB),
            expiry_time: request.expiry_time,
            tg_id: request.tg_id,
            sub_id: request.sub_id.clone(),
            reset: 0,
            created_at: now_ms,
            updated_at: now_ms,
            ..Default::default()
        };
        match protocol {
            Protocol::Vmess => {
                client.id = Some(random_uuid(rng).to_string());
                client.security = Some(DEFAULT_VMESS_SECURITY.to_string());
                client.alter_id = Some(0);
            }
            Protocol::Vless => {
                client.id = Some(random_uuid(rng).to_string());
                client.flow = Some(String::new());
            }
            Protocol::Trojan => {
                client.password = Some(random_string(rng, self.password_length));
                client.flow = Some(String::new());
            }
            Protocol::Shadowsocks => {
                client.password = Some(random_string(rng, self.password_length));
            }
            Protocol::Other(tag) => return Err(LinkError::UnsupportedProtocol(tag.clone())),
        }
        Ok(client)
    }

    pub fn sub_id<R: Rng + CryptoRng>(&self, rng: &mut R) -> String {
        random_string(rng, self.sub_id_length)
    }
}

/// [`ClientGenerator::generate`] with default lengths at the current time.
pub fn generate_client_defaults<R: Rng + CryptoRng>(
    protocol: &Protocol,
    request: &NewClient,
    rng: &mut R,
) -> Result<ClientRecord, LinkError> {
    ClientGenerator::default().generate(protocol, request, unix_now() * 1000, rng)
}

/// Result of [`add_client_with_link`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientLink {
    pub link: String,
    /// The client UUID, or the password for Trojan and Shadowsocks.
    pub uuid: String,
    pub email: String,
}

/// Strip a trailing `:port` from a request host; IPv6 brackets are removed.
pub fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split_once(']').map_or(host, |(addr, _)| addr);
    }
    match host.split_once(':') {
        Some((name, port)) if !port.contains(':') => name,
        _ => host,
    }
}

/// Generate a default client, append it to `inbound`'s settings and return
/// its link for `host`.
///
/// An empty `sub_id` in the request is replaced by a random one. The inbound
/// is only modified when every step succeeds.
pub fn add_client_with_link<R: Rng + CryptoRng>(
    inbound: &mut Inbound,
    request: &NewClient,
    host: &str,
    generator: &ClientGenerator,
    ctx: &LinkContext,
    rng: &mut R,
) -> Result<ClientLink, LinkError> {
    let settings = InboundSettings::parse(&inbound.settings)?;
    if settings.client(&request.email).is_some() {
        return Err(LinkError::ClientExists(request.email.clone()));
    }

    let mut request = request.clone();
    if request.sub_id.is_empty() {
        request.sub_id = generator.sub_id(rng);
    }
    let client = generator.generate(&inbound.protocol, &request, ctx.now * 1000, rng)?;
    inbound.settings = append_client(&inbound.settings, &client)?;
    info!(
        inbound = inbound.id,
        protocol = %inbound.protocol,
        email = %client.email,
        "client added"
    );

    let link = crate::client_link(inbound, strip_port(host), &client.email, ctx, rng)?;
    Ok(ClientLink {
        link,
        uuid: client.credential(&inbound.protocol).to_string(),
        email: client.email,
    })
}
