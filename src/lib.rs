//! # xui-rs
//!
//! Share-link generation and client tooling for xray panel inbounds.
//!
//! ## Crates
//!
//! - [`xui_core`] - Shared constants and error kind labels
//! - [`xui_config`] - Configuration loading and validation
//! - [`xui_inbound`] - Inbound model, settings decoding and client lookup
//! - [`xui_link`] - Link encoders, client generation and subscriptions

pub use xui_config as config;
pub use xui_core as core;
pub use xui_inbound as inbound;
pub use xui_link as link;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use xui_config::{Config, load_config, validate_config};
    pub use xui_inbound::{ClientRecord, Inbound, InboundSettings, Protocol, StreamSettings};
    pub use xui_link::{
        ClientGenerator, LinkContext, LinkError, NewClient, add_client_with_link, client_link,
        generate_client_defaults,
    };
}
