//! Inbound data model for the link encoders.
//!
//! An [`Inbound`] stores its protocol settings and stream settings as raw
//! JSON text. This crate decodes both blobs into typed views without ever
//! failing on absent or mistyped fields, and locates clients by email.

mod client;
mod error;
mod field;
mod model;
mod search;
mod settings;
mod stream;

pub use client::{ClientRecord, find_client};
pub use error::DecodeError;
pub use model::{ClientTraffic, Inbound, Protocol};
pub use search::{search_host, search_key, search_str};
pub use settings::{InboundSettings, append_client};
pub use stream::{
    ExternalProxy, ForceTls, HttpRequest, RealitySettings, Security, StreamSettings, TlsSettings,
    Transport,
};
