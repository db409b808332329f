//! Operator CLI for the Saranyu delegation ledger
//!
//! Runs ledger operations against a filesystem record store. Every numeric
//! argument is handed to the ledger contract as decimal text. Results are
//! printed to stdout as JSON; logs and errors go to stderr. A rejected
//! ledger operation exits with a code identifying its error kind.

use anyhow::Result;
use clap::{Parser, Subcommand};
use saranyu_core::{LedgerClockEffects, LedgerTime};
use saranyu_delegation::{DelegationContract, DelegationLedger};
use saranyu_effects::{FilesystemStorageHandler, FixedClockHandler, SystemClockHandler};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod handlers;

use commands::{DelegationCommand, ServiceCommand, SubDelegationCommand, TenantCommand};
use handlers::{delegation, identity, Contract};

#[derive(Parser)]
#[command(name = "saranyu")]
#[command(about = "Saranyu - delegation and capacity ledger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Record store directory (overrides the config file)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Transaction timestamp in Unix seconds; the local clock is used if absent
    #[arg(long, global = true)]
    at: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the bootstrap tenants and services
    Init,

    /// Tenant account management
    #[command(subcommand)]
    Tenant(TenantCommand),

    /// Service registration
    #[command(subcommand)]
    Service(ServiceCommand),

    /// Root delegations between services
    #[command(subcommand)]
    Delegation(DelegationCommand),

    /// Redelegations to tenants
    #[command(subcommand)]
    Sub(SubDelegationCommand),

    /// Print the raw record stored under an identifier
    Show {
        /// Record identifier
        pck: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(handlers::exit_code(&err))
        }
    }
}

async fn run(cli: &Cli) -> Result<String> {
    let config = config::load_config(cli.config.as_deref(), cli.store.clone())?;
    let clock: Arc<dyn LedgerClockEffects> = match cli.at {
        Some(secs) => Arc::new(FixedClockHandler::new(LedgerTime::from_secs(secs))),
        None => {
            tracing::debug!("no --at given, using the local clock");
            Arc::new(SystemClockHandler::new())
        }
    };
    let store = FilesystemStorageHandler::new(config.storage_dir.clone());
    let contract: Contract =
        DelegationContract::new(DelegationLedger::with_config(store, clock, &config));

    let output = match &cli.command {
        Commands::Init => {
            if config.seed_identities {
                let seeded = contract.init_ledger().await?;
                serde_json::json!({ "seeded": seeded })
            } else {
                tracing::info!("seed_identities is disabled, nothing to do");
                serde_json::json!({ "seeded": 0 })
            }
        }
        Commands::Tenant(command) => identity::handle_tenant(&contract, command).await?,
        Commands::Service(command) => identity::handle_service(&contract, command).await?,
        Commands::Delegation(command) => delegation::handle_delegation(&contract, command).await?,
        Commands::Sub(command) => delegation::handle_sub_delegation(&contract, command).await?,
        Commands::Show { pck } => serde_json::to_value(contract.read_record(pck).await?)?,
    };

    Ok(serde_json::to_string_pretty(&output)?)
}
