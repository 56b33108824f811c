//! CLI module for xui-link.
//!
//! Subcommands operate on inbound records exported from the panel as JSON
//! and are mounted by the unified `xui-rs` binary.
//!
//! # Usage
//!
//! ```bash
//! # Share link for one client
//! xui-rs link -i inbound.json -e alice -a 203.0.113.10
//!
//! # Generate a default client record
//! xui-rs client -p vless -e alice --total-gb 10
//!
//! # Add a client to an inbound file and print its link
//! xui-rs add -i inbound.json -e bob --host panel.example.com:2053 --write
//!
//! # Subscription for a group, base64 encoded
//! xui-rs sub -i inbounds.json -s 3kf9a0c2 --base64
//!
//! # List clients
//! xui-rs list -i inbound.json -f csv
//! ```

use std::io;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use tabled::{Table, Tabled};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use xui_config::{CliOverrides, Config, LoggingConfig, apply_overrides, load_config, load_config_or_default, validate_config};
use xui_core::{DEFAULT_CONFIG_PATH, DEFAULT_LOG_FORMAT, DEFAULT_LOG_LEVEL, DEFAULT_LOG_OUTPUT};
use xui_inbound::{Inbound, InboundSettings, Protocol};

use crate::format::{format_expiry, format_quota, format_traffic};
use crate::{
    ClientGenerator, LinkContext, LinkError, NewClient, add_client_with_link, build_subscription,
    build_subscription_base64, client_link,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Config file path (json/jsonc/yaml/toml)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(flatten)]
    pub overrides: CliOverrides,
}

/// Print the share link(s) of one client.
#[derive(Args, Debug, Clone)]
pub struct LinkArgs {
    /// Inbound record (JSON).
    #[arg(short, long)]
    pub inbound: PathBuf,

    /// Client email.
    #[arg(short, long)]
    pub email: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Fields of a client to generate.
#[derive(Args, Debug, Clone)]
pub struct NewClientArgs {
    /// Client email.
    #[arg(short, long)]
    pub email: String,

    /// Traffic quota in GB (0 for unlimited).
    #[arg(long, default_value_t = 0)]
    pub total_gb: i64,

    /// Expiry in unix milliseconds; negative for a duration from first use.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub expiry_time: i64,

    /// Concurrent IP limit (0 for unlimited).
    #[arg(long, default_value_t = 0)]
    pub limit_ip: i64,

    /// Telegram user id.
    #[arg(long, default_value_t = 0)]
    pub tg_id: i64,

    /// Subscription group id (random when empty).
    #[arg(short, long, default_value = "")]
    pub sub_id: String,
}

impl From<&NewClientArgs> for NewClient {
    fn from(args: &NewClientArgs) -> Self {
        Self {
            email: args.email.clone(),
            total_gb: args.total_gb,
            expiry_time: args.expiry_time,
            limit_ip: args.limit_ip,
            tg_id: args.tg_id,
            sub_id: args.sub_id.clone(),
        }
    }
}

/// Generate a default client record and print it as JSON.
#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// Protocol (vmess, vless, trojan, shadowsocks).
    #[arg(short, long)]
    pub protocol: String,

    #[command(flatten)]
    pub client: NewClientArgs,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Add a default client to an inbound and print its link.
#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Inbound record (JSON).
    #[arg(short, long)]
    pub inbound: PathBuf,

    /// Request host the link should point at; a port suffix is dropped.
    /// Defaults to the configured link address.
    #[arg(long)]
    pub host: Option<String>,

    /// Write the updated inbound back to its file.
    #[arg(short, long)]
    pub write: bool,

    #[command(flatten)]
    pub client: NewClientArgs,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Print the subscription of a group.
#[derive(Args, Debug, Clone)]
pub struct SubArgs {
    /// Inbound records (JSON array).
    #[arg(short, long)]
    pub inbounds: PathBuf,

    /// Subscription group id.
    #[arg(short, long)]
    pub sub_id: String,

    /// Base64 encode the output.
    #[arg(long)]
    pub base64: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// List the clients of an inbound.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Inbound record (JSON).
    #[arg(short, long)]
    pub inbound: PathBuf,

    /// Output format (table, json, csv).
    #[arg(short, long, default_value = "table")]
    pub format: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Print the link(s) for one client.
pub fn run_link(args: LinkArgs) -> CliResult {
    let config = setup(&args.common)?;
    let inbound = read_inbound(&args.inbound)?;
    let ctx = LinkContext::from_config(&config.links);
    let link = client_link(
        &inbound,
        &config.links.address,
        &args.email,
        &ctx,
        &mut rand::thread_rng(),
    )?;
    if link.is_empty() {
        return Err(format!("no link for {} on inbound {}", args.email, inbound.id).into());
    }
    println!("{}", link);
    Ok(())
}

/// Print a generated client record.
pub fn run_client(args: ClientArgs) -> CliResult {
    let config = setup(&args.common)?;
    let generator = ClientGenerator::from_config(&config.clients);
    let mut rng = rand::thread_rng();
    let mut request = NewClient::from(&args.client);
    if request.sub_id.is_empty() {
        request.sub_id = generator.sub_id(&mut rng);
    }
    let ctx = LinkContext::from_config(&config.links);
    let client = generator.generate(&Protocol::from(args.protocol), &request, ctx.now * 1000, &mut rng)?;
    println!("{}", serde_json::to_string_pretty(&client)?);
    Ok(())
}

/// Add a client and print its link as JSON.
pub fn run_add(args: AddArgs) -> CliResult {
    let config = setup(&args.common)?;
    let mut inbound = read_inbound(&args.inbound)?;
    let host = args.host.as_deref().unwrap_or(&config.links.address);
    let result = add_client_with_link(
        &mut inbound,
        &NewClient::from(&args.client),
        host,
        &ClientGenerator::from_config(&config.clients),
        &LinkContext::from_config(&config.links),
        &mut rand::thread_rng(),
    )?;
    if args.write {
        std::fs::write(&args.inbound, serde_json::to_string_pretty(&inbound)?)?;
        info!(path = %args.inbound.display(), "inbound updated");
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Print the links of a subscription group.
pub fn run_sub(args: SubArgs) -> CliResult {
    let config = setup(&args.common)?;
    let data = std::fs::read_to_string(&args.inbounds)?;
    let inbounds: Vec<Inbound> = serde_json::from_str(&data)?;
    let ctx = LinkContext::from_config(&config.links);
    let address = &config.links.address;
    let mut rng = rand::thread_rng();
    if args.base64 {
        let encoded = build_subscription_base64(&inbounds, &args.sub_id, address, &ctx, &mut rng)?;
        println!("{}", encoded);
    } else {
        for link in build_subscription(&inbounds, &args.sub_id, address, &ctx, &mut rng)? {
            println!("{}", link);
        }
    }
    Ok(())
}

/// Print the clients of an inbound.
pub fn run_list(args: ListArgs) -> CliResult {
    let config = setup(&args.common)?;
    let inbound = read_inbound(&args.inbound)?;
    let now = LinkContext::from_config(&config.links).now;
    let rows = client_rows(&inbound, now)?;
    println!("{}", render_clients(rows, &args.format)?);
    Ok(())
}

#[derive(Debug, Clone, Tabled, Serialize)]
struct ClientRow {
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Credential")]
    credential: String,
    #[tabled(rename = "Quota")]
    quota: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Expires")]
    expires: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
}

fn client_rows(inbound: &Inbound, now: i64) -> Result<Vec<ClientRow>, LinkError> {
    let settings = InboundSettings::parse(&inbound.settings)?;
    Ok(settings
        .clients
        .iter()
        .map(|client| {
            let used = inbound
                .client_traffic(&client.email)
                .map_or(0, |stats| stats.up.saturating_add(stats.down));
            ClientRow {
                email: client.email.clone(),
                credential: client.credential(&inbound.protocol).to_string(),
                quota: format_quota(client.total_bytes),
                used: format_traffic(used),
                expires: format_expiry(client.expiry_time, now),
                enabled: if client.enable { "Yes" } else { "No" }.to_string(),
            }
        })
        .collect())
}

fn render_clients(rows: Vec<ClientRow>, format: &str) -> Result<String, serde_json::Error> {
    match format {
        "json" => serde_json::to_string_pretty(&rows),
        "csv" => {
            let mut out = String::from("email,credential,quota,used,expires,enabled");
            for row in rows {
                out.push('\n');
                out.push_str(&format!(
                    "{},{},{},{},{},{}",
                    row.email, row.credential, row.quota, row.used, row.expires, row.enabled
                ));
            }
            Ok(out)
        }
        _ => Ok(Table::new(rows).to_string()),
    }
}

fn read_inbound(path: &Path) -> Result<Inbound, Box<dyn std::error::Error>> {
    let data = std::fs::read_to_string(path)?;
    let inbound: Inbound = serde_json::from_str(&data)?;
    debug!(path = %path.display(), inbound = inbound.id, protocol = %inbound.protocol, "inbound loaded");
    Ok(inbound)
}

/// Load and validate the config, then start logging.
///
/// A missing file at the default path falls back to built-in defaults.
fn setup(common: &CommonArgs) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if common.config == Path::new(DEFAULT_CONFIG_PATH) {
        load_config_or_default(&common.config)?
    } else {
        load_config(&common.config)?
    };
    apply_overrides(&mut config, &common.overrides);
    validate_config(&config)?;
    init_tracing(&config.logging);
    Ok(config)
}

/// Initialize tracing subscriber with the given logging configuration.
///
/// Supports:
/// - `level`: Base log level (trace, debug, info, warn, error)
/// - `format`: Output format (json, pretty, compact). Default: pretty
/// - `output`: Output target (stdout, stderr). Default: stderr
/// - `filters`: Per-module log level overrides
fn init_tracing(config: &LoggingConfig) {
    let base_level = config.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL);
    let mut filter_str = base_level.to_string();

    for (module, level) in &config.filters {
        filter_str.push(',');
        filter_str.push_str(module);
        filter_str.push('=');
        filter_str.push_str(level);
    }

    let filter = EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let format = config.format.as_deref().unwrap_or(DEFAULT_LOG_FORMAT);
    let output = config.output.as_deref().unwrap_or(DEFAULT_LOG_OUTPUT);

    // links go to stdout, so logs default to stderr
    let registry = tracing_subscriber::registry().with(filter);
    let result = match (format, output) {
        ("json", "stdout") => registry.with(fmt::layer().json().with_writer(io::stdout)).try_init(),
        ("json", _) => registry.with(fmt::layer().json().with_writer(io::stderr)).try_init(),
        ("compact", "stdout") => registry.with(fmt::layer().compact().with_writer(io::stdout)).try_init(),
        ("compact", _) => registry.with(fmt::layer().compact().with_writer(io::stderr)).try_init(),
        (_, "stdout") => registry.with(fmt::layer().with_writer(io::stdout)).try_init(),
        _ => registry.with(fmt::layer().with_writer(io::stderr)).try_init(),
    };
    if result.is_err() {
        debug!("tracing subscriber already installed");
    }
}
