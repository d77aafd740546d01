//! Read-only inspector for bridge state and bridge-out logs.
//!
//! Usage:
//!   bridge-cli --config config/bridge.toml config
//!   bridge-cli route usdc-iotex
//!   bridge-cli log "Program log: Bridge: 37cb..."

use anyhow::{anyhow, Context, Result};
use bridge_core::utils::find_token_authority;
use bridge_core::{
    extract_bridge_logs, parse_log_line, BridgeAccount, BridgeClient, BridgeClientConfig,
    BridgeLog, Config, Destination, LedgerClient, RouteConfig,
};
use bridge_solana::RpcLedger;
use clap::{Parser, Subcommand};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::str::FromStr;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bridge-cli")]
#[command(about = "Inspect token bridge accounts and logs", long_about = None)]
struct Cli {
    /// Path to the client config file
    #[arg(short, long, default_value = "config/bridge.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the bridge config account
    Config,

    /// Show a route, by configured name or bridge account address
    Route { route: String },

    /// Decode a single bridge log line
    Log { line: String },

    /// Decode the bridge logs of a confirmed transaction
    Logs { signature: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Log { line } = &cli.command {
        tracing_subscriber::fmt::init();
        let log = parse_log_line(line).ok_or_else(|| anyhow!("not a bridge log line"))??;
        print_log(&log);
        return Ok(());
    }

    let (config, routes) = BridgeClientConfig::load_from_file(&cli.config)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.monitoring.log_level))
        .init();

    let program_id = config.program_id()?;
    let client = BridgeClient::new(RpcLedger::from_config(&config)?, program_id);
    info!(rpc_url = %config.cluster.rpc_url, %program_id, "connected");

    match cli.command {
        Commands::Config => {
            let address = config.config_account()?;
            let state = client.fetch_config(&address).await?;
            print_config(&address, &state);
        }
        Commands::Route { route } => {
            let (address, entry) = resolve_route(&routes, &route)?;
            let state = client.fetch_bridge_account(&address).await?;
            print_route(&program_id, &address, &state);

            let token_program = config.token_program_id()?;
            let mismatches = match entry {
                Some(entry) => entry.mismatches(&state, &token_program)?,
                None if state.token_program_id != token_program => vec![format!(
                    "token program {} (configured {})",
                    state.token_program_id, token_program
                )],
                None => Vec::new(),
            };
            for mismatch in &mismatches {
                warn!(%address, "route differs from config: {}", mismatch);
                println!("mismatch         {}", mismatch);
            }
        }
        Commands::Logs { signature } => {
            let signature = Signature::from_str(&signature).context("invalid signature")?;
            let lines = client.ledger().transaction_logs(&signature).await?;
            let logs = extract_bridge_logs(&lines)?;
            if logs.is_empty() {
                println!("no bridge logs in {}", signature);
            }
            for log in &logs {
                print_log(log);
            }
        }
        Commands::Log { .. } => {}
    }

    Ok(())
}

/// Looks up a configured route by name, falling back to a raw address.
fn resolve_route<'a>(routes: &'a [RouteConfig], route: &str) -> Result<(Pubkey, Option<&'a RouteConfig>)> {
    if let Some(found) = routes.iter().find(|r| r.name == route) {
        return Ok((found.bridge_account()?, Some(found)));
    }
    let address = Pubkey::from_str(route).with_context(|| format!("unknown route {:?}", route))?;
    Ok((address, routes.iter().find(|r| r.bridge_account == route)))
}

fn print_config(address: &Pubkey, config: &Config) {
    println!("config         {}", address);
    println!("initialized    {}", config.initialized);
    println!("owner          {}", config.owner);
    println!("authority      {}", config.authority);
    println!("fee            {}", config.fee);
    println!("fee collector  {}", config.fee_collector);
}

fn print_route(program_id: &Pubkey, address: &Pubkey, account: &BridgeAccount) {
    let (token_authority, _) = find_token_authority(program_id, address);
    let destination = match account.destination() {
        Destination::HomeChain => "home chain (burn/mint)".to_string(),
        Destination::Chain(id) => format!("chain {} (lock/release)", id),
    };

    println!("bridge account   {}", address);
    println!("initialized      {}", account.initialized);
    println!("bump seed        {}", account.bump_seed);
    println!("token authority  {}", token_authority);
    println!("token program    {}", account.token_program_id);
    println!("config           {}", account.config);
    println!("token account    {}", account.token);
    println!("token mint       {}", account.token_mint);
    println!("destination      {}", destination);
    println!("index            {}", account.index);
    println!("limits           [{}, {}]", account.min, account.max);
}

fn print_log(log: &BridgeLog) {
    println!("token        {}", log.token);
    println!("index        {}", log.index);
    println!("sender       {}", log.sender);
    println!("recipient    {}", log.recipient);
    println!("amount       {}", log.amount);
    println!("fee          {}", log.fee);
    println!("destination  {}", log.destination);
    println!("payload      {}", hex::encode(&log.payload));
}
