//! Sonic wallet shell host.
//!
//! Run the host, then connect a backend and a renderer:
//!   cargo run -p sonic-relay -- --wallet-file ~/main.wallet
//!   cargo run -p sonic-mock-backend
//!   cargo run -p sonic-renderer

use clap::Parser;
use sonic_relay::{Host, HostEvent, HostSettings, Overrides, transport};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sonic-host")]
#[command(about = "Relay between the Sonic wallet backend and renderer")]
struct Cli {
    /// TOML settings file
    #[arg(long, env = "SONIC_HOST_CONFIG")]
    config: Option<PathBuf>,

    /// Address to accept peers on
    #[arg(long, env = "SONIC_LISTEN")]
    listen: Option<SocketAddr>,

    /// Directory the wallet settings are persisted under
    #[arg(long)]
    config_path: Option<String>,

    /// Wallet file to open on start
    #[arg(long)]
    wallet_file: Option<String>,

    /// Seconds to wait for the backend to stop before exiting
    #[arg(long)]
    shutdown_timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("sonic_host=info".parse()?)
                .add_directive("sonic_relay=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let overrides = Overrides {
        listen: cli.listen,
        shutdown_timeout_secs: cli.shutdown_timeout_secs,
        config_path: cli.config_path,
        wallet_file: cli.wallet_file,
    };
    let settings = HostSettings::load(cli.config.as_deref(), overrides)?;
    tracing::info!("settings directory {}", settings.config_path);

    let listener = TcpListener::bind(settings.listen).await?;
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let transport_events = events_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = transport::serve(listener, transport_events).await {
            tracing::error!("transport stopped: {}", e);
        }
    });

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = events_tx.send(HostEvent::ShutdownSignal);
        }
    });

    let host = Host::new(settings.wallet, settings.config_path)
        .with_shutdown_timeout(settings.shutdown_timeout);
    let reason = host.run(events_rx).await;
    tracing::info!("exiting: {:?}", reason);
    Ok(())
}
