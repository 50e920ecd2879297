//! Stand-in wallet backend.
//!
//! Connects to the host as the backend and answers with a small fixed
//! wallet: a few transactions, a balance, and a fully synced chain.
//!
//! Run the host first, then:
//!   cargo run -p sonic-mock-backend

use clap::Parser;
use serde_json::{Value, json};
use sonic_client::{ClientError, Connection};
use sonic_core::{
    Balance, BackendEvent, Channel, Frame, HostCommand, HostControl, Message, OperationResponse,
    Role, SyncStatus, UiRequest, WalletConfig,
};
use tracing_subscriber::EnvFilter;

const ADDRESS: &str = "BTNn1mockAddressFor2the3Sonic4wallet5shell6demo";
const HEIGHT: u64 = 120_000;

#[derive(Parser)]
#[command(name = "sonic-mock-backend")]
#[command(about = "Fake wallet backend for exercising the Sonic shell")]
struct Cli {
    /// Host WebSocket URL
    #[arg(long, env = "SONIC_HOST_URL", default_value = "ws://127.0.0.1:45300")]
    host: String,

    /// Number of transactions in the fake wallet
    #[arg(long, default_value_t = 12)]
    transactions: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("sonic_mock_backend=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let mut connection = sonic_client::connect(&cli.host, Role::Backend).await?;
    tracing::info!("connected to {}", cli.host);

    while let Some(frame) = connection.recv().await {
        if !handle(&connection, frame, cli.transactions)? {
            break;
        }
    }
    tracing::info!("backend stopped");
    Ok(())
}

/// Returns `false` once the backend should exit.
fn handle(connection: &Connection, frame: Frame, total: u64) -> Result<bool, ClientError> {
    match dispatch(connection, frame, total) {
        Err(ClientError::Codec(e)) => {
            tracing::warn!("dropping malformed message: {}", e);
            Ok(true)
        }
        result => result,
    }
}

fn dispatch(connection: &Connection, frame: Frame, total: u64) -> Result<bool, ClientError> {
    let Frame { channel, envelope } = frame;
    match channel {
        Channel::FromMain => match HostCommand::decode(envelope)? {
            HostCommand::Config(config) => open_wallet(connection, &config, total)?,
            HostCommand::StopRequest => {
                tracing::info!("stop requested");
                connection.send(Channel::ToMain, &HostControl::BackendStopped)?;
                return Ok(false);
            }
            HostCommand::Unknown { message_type, .. } => {
                tracing::info!("ignoring host message `{}`", message_type);
            }
        },
        Channel::FromFrontend => match UiRequest::decode(envelope)? {
            // Sent again with the renderer's copy of the wallet settings.
            UiRequest::Config(config) => open_wallet(connection, &config, total)?,
            UiRequest::OpenNewWallet => {
                tracing::info!("closing current wallet");
                reply(connection, BackendEvent::WalletActiveStatus(false))?;
            }
            UiRequest::SendTransaction { hash } => {
                tracing::info!("sending {}", hash);
                let response = OperationResponse::success().with_hash(hash);
                reply(connection, BackendEvent::SendTransactionResponse(response))?;
            }
            UiRequest::Transactions(count) => {
                reply(connection, BackendEvent::TransactionList(transactions(count.min(total))))?;
            }
            other => tracing::info!("not supported here: `{}`", other.message_type()),
        },
        other => tracing::warn!("unexpected frame on {:?}", other),
    }
    Ok(true)
}

fn open_wallet(connection: &Connection, config: &WalletConfig, total: u64) -> Result<(), ClientError> {
    tracing::info!(
        "opening {}",
        config.wallet_file().unwrap_or("<no wallet file>")
    );
    let events = [
        BackendEvent::WalletActiveStatus(true),
        BackendEvent::PrimaryAddress(ADDRESS.to_string()),
        BackendEvent::Balance(Balance {
            unlocked: 1_250_000,
            locked: 50_000,
        }),
        BackendEvent::SyncStatus(SyncStatus {
            wallet_height: HEIGHT,
            local_daemon_height: HEIGHT,
            network_height: HEIGHT,
        }),
        BackendEvent::TransactionCount(total),
        BackendEvent::TransactionList(transactions(total.min(10))),
    ];
    for event in events {
        reply(connection, event)?;
    }
    Ok(())
}

fn reply(connection: &Connection, event: BackendEvent) -> Result<(), ClientError> {
    connection.send(Channel::FromBackend, &event)
}

fn transactions(count: u64) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let amount: i64 = if i % 3 == 0 { -10_000 } else { 25_000 };
            json!({
                "hash": format!("{:064x}", i + 1),
                "amount": amount,
                "blockHeight": HEIGHT.saturating_sub(i * 7),
                "timestamp": 1_700_000_000 + i * 600,
            })
        })
        .collect()
}
