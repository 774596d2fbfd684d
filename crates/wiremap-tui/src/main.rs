//! `wiremap` -- Terminal admin console for the wiremap network inventory.
//!
//! Built on [ratatui](https://ratatui.rs) against the `wiremap-core`
//! service layer. Buildings drill down to floors and floor plans;
//! number keys (1-3) jump between the Buildings, Switches, and Topology
//! tabs. Every screen change goes through the route table, so the
//! access guard decides what an unauthenticated session may see.
//!
//! Logs are written to a file (default `/tmp/wiremap.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and
//! app launch.

mod action;
mod app;
mod component;
mod event;
mod overlay;
mod screen;
mod screens;
mod theme;
mod tui;

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use wiremap_core::{Inventory, InventoryClient};

use crate::app::App;

/// Terminal admin console for the wiremap physical network inventory.
#[derive(Parser, Debug)]
#[command(name = "wiremap", version, about)]
struct Cli {
    /// Inventory service URL (e.g. https://inventory.example.net)
    #[arg(short = 's', long, env = "WIREMAP_SERVICE")]
    service: Option<String>,

    /// Username for the service session (pre-fills the login screen)
    #[arg(short = 'u', long, env = "WIREMAP_USERNAME")]
    username: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Log file path (defaults to /tmp/wiremap.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr -- that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application to ensure logs are flushed.
fn setup_tracing(log_file: &Path, verbose: u8) -> WorkerGuard {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "wiremap_tui={log_level},wiremap_core={log_level},wiremap_api={log_level}"
        ))
    });

    let log_dir = log_file.parent().unwrap_or(Path::new("/tmp"));
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("wiremap.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Config file + environment, then CLI flags on top
    let mut config = wiremap_config::load_config_or_default();
    if let Some(service) = cli.service {
        config.service = service;
    }
    if let Some(username) = cli.username {
        config.username = Some(username);
    }
    if cli.insecure {
        config.insecure = true;
    }

    let log_file = cli
        .log_file
        .or_else(|| config.log_file.clone())
        .unwrap_or_else(|| PathBuf::from("/tmp/wiremap.log"));

    // Tracing to file -- hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&log_file, cli.verbose);

    info!(service = %config.service, "starting wiremap console");

    let url = wiremap_config::service_url(&config)?;
    let transport = wiremap_config::transport_config(&config);
    let client = InventoryClient::new(url, &transport)?;
    let inventory = Inventory::new(client);

    // With both halves configured the console signs in by itself;
    // otherwise the login screen asks.
    let credentials = wiremap_config::resolve_credentials(&config).ok();
    let login_hint = config.username.clone();

    let mut app = App::new(inventory, credentials, login_hint);
    app.run().await?;

    Ok(())
}
