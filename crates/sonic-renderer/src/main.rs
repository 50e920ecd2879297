//! Headless Sonic renderer.
//!
//! Connects to the host as the frontend, prints UI events and reads
//! commands from stdin, one per line:
//!
//!   send | open <path> | txs <n> | save-as <path> | export <path>
//!   backup-file <path> | backup-clipboard | lock
//!   login [--password] | login-failed | set <key> <json>

use anyhow::{Context, bail};
use clap::Parser;
use sonic_core::Role;
use sonic_renderer::{Dispatcher, MemoryStore, UiCommand, UiEvent};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sonic-renderer")]
#[command(about = "Headless renderer for the Sonic wallet shell")]
struct Cli {
    /// Host WebSocket URL
    #[arg(long, env = "SONIC_HOST_URL", default_value = "ws://127.0.0.1:45300")]
    host: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("sonic_renderer=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let connection = sonic_client::connect(&cli.host, Role::Frontend)
        .await
        .with_context(|| format!("connecting to {}", cli.host))?;
    tracing::info!("connected to {}", cli.host);

    let (link, mut inbox) = connection.into_parts();
    let (handle, dispatcher) = Dispatcher::new(link, Arc::new(MemoryStore::new())).spawn();
    let mut events = handle.subscribe();

    let frames = handle.clone();
    tokio::spawn(async move {
        while let Some(frame) = inbox.recv().await {
            if !frames.frame(frame) {
                break;
            }
        }
        tracing::info!("host connection closed");
    });

    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => print_event(&event),
                Err(RecvError::Lagged(n)) => tracing::warn!("missed {} UI events", n),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_command(line) {
            Ok(command) => {
                if !handle.command(command) {
                    break;
                }
            }
            Err(e) => eprintln!("{}", e),
        }
    }

    drop(handle);
    dispatcher.await?;
    Ok(())
}

fn print_event(event: &UiEvent) {
    match event {
        UiEvent::OpenModal(modal) => {
            println!("[{:?}] {}", modal.severity, modal.title);
            for line in &modal.body {
                println!("    {}", line);
            }
        }
        UiEvent::GotBalance(balance) => {
            println!("balance: {} unlocked, {} locked", balance.unlocked, balance.locked);
        }
        UiEvent::GotSyncStatus(status) => println!(
            "sync: wallet {} / daemon {} / network {}",
            status.wallet_height, status.local_daemon_height, status.network_height
        ),
        other => println!("{:?}", other),
    }
}

fn parse_command(line: &str) -> anyhow::Result<UiCommand> {
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    let path = || {
        if rest.is_empty() {
            bail!("`{}` needs a path", verb)
        }
        Ok(rest.to_string())
    };

    let command = match verb {
        "send" => UiCommand::SendTransaction,
        "open" => UiCommand::OpenWallet(path()?),
        "txs" => UiCommand::RequestTransactions(
            rest.parse().with_context(|| format!("bad count `{}`", rest))?,
        ),
        "save-as" => UiCommand::SaveWalletAs(path()?),
        "export" => UiCommand::ExportToCsv(path()?),
        "backup-file" => UiCommand::BackupToFile(path()?),
        "backup-clipboard" => UiCommand::BackupToClipboard,
        "lock" => UiCommand::Lock,
        "login" => UiCommand::LoggedIn {
            password_set: rest == "--password",
        },
        "login-failed" => UiCommand::LoginFailed,
        "set" => {
            let Some((key, value)) = rest.split_once(' ') else {
                bail!("usage: set <key> <json>");
            };
            UiCommand::SetConfig {
                key: key.to_string(),
                value: serde_json::from_str(value.trim())
                    .with_context(|| format!("bad value for {}", key))?,
            }
        }
        _ => bail!("unknown command `{}`", verb),
    };
    Ok(command)
}
