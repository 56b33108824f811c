//! Unified xui-rs CLI.
//!
//! This binary provides a unified interface to the link tooling:
//! - `xui-rs link` - Print the share link(s) of a client
//! - `xui-rs client` - Generate a default client record
//! - `xui-rs add` - Add a client to an inbound and print its link
//! - `xui-rs sub` - Print the subscription of a group
//! - `xui-rs list` - List the clients of an inbound

use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// xui-rs unified CLI.
#[derive(Parser)]
#[command(
    name = "xui-rs",
    version,
    about = "Share links and client tooling for xray panel inbounds",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the share link(s) of a client.
    #[command(name = "link")]
    Link(xui_link::cli::LinkArgs),

    /// Generate a default client record.
    #[command(name = "client")]
    Client(xui_link::cli::ClientArgs),

    /// Add a client to an inbound and print its link.
    #[command(name = "add")]
    Add(xui_link::cli::AddArgs),

    /// Print the subscription of a group.
    #[command(name = "sub", alias = "subscription")]
    Sub(xui_link::cli::SubArgs),

    /// List the clients of an inbound.
    #[command(name = "list", alias = "ls")]
    List(xui_link::cli::ListArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Link(args) => xui_link::cli::run_link(args),
        Commands::Client(args) => xui_link::cli::run_client(args),
        Commands::Add(args) => xui_link::cli::run_add(args),
        Commands::Sub(args) => xui_link::cli::run_sub(args),
        Commands::List(args) => xui_link::cli::run_list(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
