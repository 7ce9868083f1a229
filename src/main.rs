//! ChainFunnel CLI
//!
//! scan     Price the scan basket across chains, print live and ranked results
//! quote    Dry run: quote every leg of a legs file, no signing
//! execute  Run every leg of a legs file in order with the local key
//!
//! Usage:
//!   chainfunnel scan --min-net-percent 0.1 --limit 10
//!   chainfunnel quote --legs legs.toml
//!   chainfunnel execute --legs legs.toml
//!
//! Created: 2026-10-18

use alloy::hex;
use alloy::primitives::Address;
use anyhow::{bail, Context, Result};
use chainfunnel::arbitrage::{OpportunityScanner, RankedResults};
use chainfunnel::chains::{chain_name, explorer_tx_url};
use chainfunnel::config::{load_config_from_file, AppConfig, LegsFile};
use chainfunnel::execution::{sequence_completed, LegExecutor, MultiLegSequencer};
use chainfunnel::format::{format_amount, format_usd, short_hash};
use chainfunnel::relay::{QuoteClient, RelayClient};
use chainfunnel::types::{ExecutionStatus, ProgressEvent, QuoteRequest, StepAction};
use chainfunnel::wallet::{LocalWalletSigner, WalletSigner};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Multi-leg cross-chain execution and spread scanning over Relay
#[derive(Parser)]
#[command(name = "chainfunnel", version)]
struct Args {
    /// Environment file to load before reading settings
    #[arg(long, env = "CHAINFUNNEL_ENV_FILE", default_value = ".env")]
    env_file: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan chain pairs for cross-chain spreads
    Scan {
        /// Only list results at or above this net profit %
        #[arg(long)]
        min_net_percent: Option<f64>,

        /// Rows in the final table (all when omitted)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Quote every leg without signing
    Quote {
        #[arg(short, long)]
        legs: PathBuf,
    },
    /// Execute every leg in order (requires PRIVATE_KEY)
    Execute {
        #[arg(short, long)]
        legs: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if args.json_logs {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).with_target(false).init();
    }

    let config = load_config_from_file(&args.env_file)?;
    info!("Relay API: {}", config.relay_api_url);

    let relay = Arc::new(
        RelayClient::new(config.relay_api_url.clone(), config.http_timeout)?
            .with_app_fee(config.app_fee),
    );
    if let Some(fee) = config.app_fee {
        info!("App fee: {} bps to {}", fee.fee_bps, fee.recipient);
    }

    match args.command {
        Command::Scan {
            min_net_percent,
            limit,
        } => run_scan(relay, &config, min_net_percent, limit).await,
        Command::Quote { legs } => run_quote(relay, &config, legs).await,
        Command::Execute { legs } => run_execute(relay, &config, legs).await,
    }
}

async fn run_scan(
    relay: Arc<RelayClient>,
    config: &AppConfig,
    min_net_percent: Option<f64>,
    limit: Option<usize>,
) -> Result<()> {
    let scanner = Arc::new(OpportunityScanner::new(relay).with_config(config.scanner));
    info!(
        "Scanning {} candidates ({} per batch, {}ms apart)",
        scanner.candidates().len(),
        config.scanner.batch_size,
        config.scanner.batch_delay.as_millis()
    );

    let mut stream = scanner.scan_stream();
    let mut ranked = RankedResults::new();
    while let Some(result) = stream.next().await {
        info!(
            "  {} {} -> {}: net {:+.3}% ({})",
            result.token,
            result.origin_chain_name,
            result.destination_chain_name,
            result.net_profit_percent,
            format_usd(result.net_profit_usd)
        );
        ranked.push(result);
    }

    if ranked.is_empty() {
        warn!("No candidate could be priced");
        return Ok(());
    }

    info!("===========================================");
    info!("   Ranked by net profit ({} priced)", ranked.len());
    info!("===========================================");
    let rows = ranked
        .as_slice()
        .iter()
        .filter(|r| min_net_percent.map_or(true, |min| r.net_profit_percent >= min))
        .take(limit.unwrap_or(usize::MAX));
    for (rank, r) in rows.enumerate() {
        info!(
            "{:>2}. {:<4} {} {} -> {} | in {} out {} fee {} | spread {:+.3}% net {:+.3}% ({}) | ~{}s",
            rank + 1,
            r.token,
            format_amount(r.amount, r.decimals),
            r.origin_chain_name,
            r.destination_chain_name,
            format_usd(r.input_usd),
            format_usd(r.output_usd),
            format_usd(r.fee_usd),
            r.spread_percent,
            r.net_profit_percent,
            format_usd(r.net_profit_usd),
            r.eta_seconds.map_or_else(|| "?".to_string(), |s| s.to_string())
        );
    }

    Ok(())
}

async fn run_quote(relay: Arc<RelayClient>, config: &AppConfig, legs: PathBuf) -> Result<()> {
    let intents = LegsFile::load(&legs)?.into_intents()?;

    let trader = match config.private_key.as_deref() {
        Some(key) => LocalWalletSigner::new(key, config.rpc_urls.clone())?.address(),
        None => Address::ZERO,
    };
    info!("DRY RUN: quoting {} leg(s), nothing is signed", intents.len());

    for intent in &intents {
        let mut request = QuoteRequest::for_intent(intent, trader);
        if trader == Address::ZERO {
            request.recipient = None;
        }

        match relay.quote(&request).await {
            Ok(quote) => {
                let v = quote.valuation;
                info!(
                    "Leg {}: {} -> {} | in {} out {} fee {} | ~{}s",
                    intent.id,
                    chain_name(intent.origin_chain_id),
                    chain_name(intent.destination_chain_id),
                    format_usd(v.input_usd),
                    format_usd(v.output_usd),
                    format_usd(v.fee_usd),
                    v.eta_seconds.map_or_else(|| "?".to_string(), |s| s.to_string())
                );
                for (i, step) in quote.steps.iter().enumerate() {
                    match &step.action {
                        StepAction::Transaction(tx) => info!(
                            "    step {}: transaction on {} to {} value {}",
                            i + 1,
                            chain_name(tx.chain_id),
                            tx.to,
                            tx.value
                        ),
                        StepAction::Signature { .. } => info!("    step {}: signature", i + 1),
                    }
                }
            }
            Err(e) => warn!("Leg {}: no quote: {}", intent.id, e),
        }
    }

    Ok(())
}

async fn run_execute(relay: Arc<RelayClient>, config: &AppConfig, legs: PathBuf) -> Result<()> {
    let intents = LegsFile::load(&legs)?.into_intents()?;
    let private_key = config
        .private_key
        .as_deref()
        .context("PRIVATE_KEY is required to execute legs")?;

    let signer = Arc::new(LocalWalletSigner::new(private_key, config.rpc_urls.clone())?);
    info!(
        "Wallet {} | RPC configured for chains {:?}",
        signer.address(),
        signer.configured_chains()
    );

    let executor = LegExecutor::new(relay, signer).with_config(config.execution);
    let sequencer = MultiLegSequencer::new(executor);

    let results = sequencer
        .execute_multi_leg(&intents, &mut |event: ProgressEvent| log_event(&event))
        .await;

    info!("===========================================");
    for result in &results {
        let outcome = &result.outcome;
        let progress = format!("{} tx, {} poll(s)", outcome.tx_hashes.len(), outcome.polls);
        let detail = match &outcome.error {
            Some(err) => format!("{}; {}", err, progress),
            None => progress,
        };
        info!("Leg {}: {} ({})", result.intent.id, outcome.status, detail);
    }
    if results.len() < intents.len() {
        warn!("{} leg(s) not attempted", intents.len() - results.len());
    }

    if !sequence_completed(&results, intents.len()) {
        bail!("Execution stopped before all legs completed");
    }
    info!("All {} leg(s) complete", intents.len());
    Ok(())
}

fn log_event(event: &ProgressEvent) {
    let position = match (event.leg_index, event.total_legs) {
        (Some(index), Some(total)) => format!("[{}/{}]", index + 1, total),
        _ => format!("[leg {}]", event.leg_id),
    };
    let request = event
        .request_id
        .as_deref()
        .map(|id| format!(" request {}", short_hash(id)))
        .unwrap_or_default();

    match (event.tx_hash, event.chain_id) {
        (Some(hash), Some(chain_id)) => info!(
            "{} {}: {} {} {}{}",
            position,
            event.status,
            event.message,
            short_hash(&hex::encode_prefixed(hash)),
            explorer_tx_url(chain_id, &hash),
            request
        ),
        _ => match event.status {
            ExecutionStatus::Error | ExecutionStatus::Failed | ExecutionStatus::Timeout => {
                error!("{} {}: {}{}", position, event.status, event.message, request)
            }
            _ => info!("{} {}: {}{}", position, event.status, event.message, request),
        },
    }
}
