use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use wallet_bridge::config::load_config;
use wallet_bridge::observability::logging::init_logging;
use wallet_bridge::resilience::Deadline;
use wallet_bridge::signer;
use wallet_bridge::wallet::{format_tokens, AllocationParams, WalletKeys};
use wallet_bridge::{Network, QuorumEngine, TransactionLifecycle, Wallet};

#[derive(Parser)]
#[command(name = "wallet-cli")]
#[command(about = "Wallet client for a quorum-replicated ledger network", long_about = None)]
struct Cli {
    /// Network and client configuration (TOML)
    #[arg(short, long, default_value = "bridge.toml")]
    config: PathBuf,

    /// Wallet key file (JSON)
    #[arg(short, long, default_value = "wallet.json")]
    wallet: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the wallet balance
    Balance {
        /// Print tokens instead of smallest units
        #[arg(long)]
        human: bool,
    },
    /// List delegate pools the wallet takes part in
    Pools,
    /// Show tokens locked in the interest pool
    LockedTokens,
    /// Show interest pool lock limits
    LockConfig,
    /// Show read pool stats
    ReadPool {
        #[arg(long)]
        allocation: Option<String>,
    },
    /// Show write pool stats
    WritePool {
        #[arg(long)]
        allocation: Option<String>,
    },
    /// List the wallet's storage allocations
    Allocations,
    /// Request tokens from the faucet
    Faucet,
    /// Lock tokens in the interest pool
    Lock {
        #[arg(long)]
        tokens: i64,
        #[arg(long, default_value_t = 0)]
        hours: i64,
        #[arg(long, default_value_t = 0)]
        minutes: i64,
    },
    /// Create a storage allocation with default parameters
    CreateAllocation,
    /// Wait for a transaction to be committed
    Confirm {
        hash: String,
        #[arg(long)]
        deadline_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    init_logging(&config.observability.log_level);

    let network = Arc::new(Network::from_config(&config.network)?);
    let engine = QuorumEngine::new(network, &config.quorum)?;
    let signer = signer::from_config(&config.signer);
    let lifecycle = TransactionLifecycle::new(engine, signer, config.confirmation.clone());

    tracing::debug!(lifecycle = ?lifecycle, "Client ready");

    let keys = WalletKeys::load(&cli.wallet)?;
    let wallet = Wallet::new(keys, lifecycle);

    let output: Value = match cli.command {
        Commands::Balance { human } => {
            let balance = wallet.get_balance().await?;
            if human {
                json!({"balance": format_tokens(balance)})
            } else {
                json!({"balance": balance})
            }
        }
        Commands::Pools => wallet.get_user_pools().await?,
        Commands::LockedTokens => wallet.get_locked_tokens().await?,
        Commands::LockConfig => wallet.get_lock_config().await?,
        Commands::ReadPool { allocation } => wallet.get_read_pool_info(allocation.as_deref()).await?,
        Commands::WritePool { allocation } => {
            wallet.get_write_pool_info(allocation.as_deref()).await?
        }
        Commands::Allocations => wallet.list_allocations().await?,
        Commands::Faucet => submitted(wallet.add_tokens().await?.hash()),
        Commands::Lock {
            tokens,
            hours,
            minutes,
        } => submitted(wallet.lock_tokens(tokens, hours, minutes).await?.hash()),
        Commands::CreateAllocation => {
            serde_json::to_value(wallet.create_allocation(&AllocationParams::default()).await?)?
        }
        Commands::Confirm {
            hash,
            deadline_secs,
        } => {
            let deadline = match deadline_secs {
                Some(secs) => Deadline::after(Duration::from_secs(secs)),
                None => wallet.lifecycle().default_deadline(),
            };
            match wallet.lifecycle().confirm(&hash, deadline).await {
                wallet_bridge::ConfirmationOutcome::Confirmed { hash, record } => {
                    json!({"status": "confirmed", "hash": hash, "record": record})
                }
                wallet_bridge::ConfirmationOutcome::Unconfirmed { reason } => {
                    json!({"status": "unconfirmed", "hash": hash, "reason": reason})
                }
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn submitted(hash: &str) -> Value {
    json!({"status": "submitted", "hash": hash})
}
