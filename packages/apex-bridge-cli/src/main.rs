//! Apex Bridge CLI
//!
//! - `apex-bridge decode <ADDRESS>`     inspect a bech32 or hex address
//! - `apex-bridge encode <HEX>`         bech32 text of raw address bytes
//! - `apex-bridge normalize <ADDRESS>`  canonical text form of an address
//! - `apex-bridge validate ...`         check a transfer against the bridging settings

mod config;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use apex_bridge_rs::{
    check_transfer, normalize_address, parse_amount, CardanoAddress, ChainId, NetworkId,
    StakeCredential, TokenId, TransferRequest,
};
use config::Config;

#[derive(Parser)]
#[command(name = "apex-bridge")]
#[command(about = "Address codec and transfer validation for the Apex bridge", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Bridging settings JSON (overrides BRIDGE_SETTINGS_PATH)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log filter (overrides BRIDGE_LOG and RUST_LOG)
    #[arg(long, global = true)]
    log: Option<String>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a bech32 address, or raw address bytes in hex
    Decode { address: String },

    /// Encode raw address bytes (hex) as bech32
    Encode {
        hex: String,

        /// Use this network's prefix instead of the one in the header.
        /// Text whose prefix differs from the header network does not decode.
        #[arg(long)]
        network: Option<u8>,
    },

    /// Print the canonical text form of an address
    Normalize { address: String },

    /// Validate a transfer; exits with status 1 when it is rejected
    Validate {
        /// Source chain (prime, vector, cardano, nexus)
        #[arg(long)]
        source: ChainId,

        /// Destination chain
        #[arg(long)]
        destination: ChainId,

        /// Receiver address on the destination chain
        #[arg(long)]
        receiver: String,

        /// Amount in the source chain's smallest unit, or in display
        /// units with --display
        #[arg(long)]
        amount: String,

        /// Token id; defaults to the source chain's currency
        #[arg(long)]
        token: Option<u32>,

        /// Read --amount in display units (e.g. 1.5)
        #[arg(long)]
        display: bool,
    },
}

fn main() -> Result<()> {
    // Install color-eyre for better error reporting
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = Config::load()?.with_overrides(cli.settings.clone(), cli.log.clone());
    init_logging(&config, cli.verbose);

    match cli.command {
        Commands::Decode { address } => {
            let decoded = decode_any(&address)
                .ok_or_else(|| eyre!("Not a supported address: {}", address))?;
            print_address(&decoded, cli.json);
        }

        Commands::Encode { hex, network } => {
            let decoded = CardanoAddress::from_hex(&hex)
                .ok_or_else(|| eyre!("Not a supported raw address: {}", hex))?;
            let network = network.map(NetworkId::from);
            let text = decoded.to_bech32(network).ok_or_else(|| {
                eyre!(
                    "No bech32 prefix for network {}",
                    network.unwrap_or_else(|| decoded.network())
                )
            })?;
            println!("{}", text);
        }

        Commands::Normalize { address } => {
            let text = normalize_address(&address)
                .ok_or_else(|| eyre!("Not a supported address: {}", address))?;
            println!("{}", text);
        }

        Commands::Validate {
            source,
            destination,
            receiver,
            amount,
            token,
            display,
        } => {
            let settings = config.load_settings()?;
            let token = match token {
                Some(id) => TokenId(id),
                None => settings
                    .chain(source)
                    .map(|chain| chain.currency_token_id)
                    .ok_or_else(|| eyre!("Chain {} is not configured", source))?,
            };
            let amount = if display {
                parse_amount(&amount, source.decimals())
            } else {
                amount.trim().parse().ok()
            }
            .ok_or_else(|| eyre!("Invalid amount: {}", amount))?;

            let request = TransferRequest {
                source,
                destination,
                receiver: &receiver,
                amount,
                token,
            };

            tracing::info!(
                source = %source,
                destination = %destination,
                token = %token,
                amount = %amount,
                "Validating transfer"
            );

            let result = check_transfer(&settings, &request);
            if cli.json {
                let error = result.as_ref().err().map(|e| e.to_string());
                println!("{}", json!({ "valid": result.is_ok(), "error": error }));
            } else if let Err(e) = &result {
                eprintln!("{}", e);
            } else {
                println!("OK");
            }

            if result.is_err() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Initialize tracing with the configured filter.
///
/// Logs go to stderr so command output stays parseable.
fn init_logging(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if let Some(directives) = &config.log_filter {
        EnvFilter::new(directives)
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,apex_bridge_rs=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Decode bech32 text, falling back to hex-encoded raw bytes
fn decode_any(text: &str) -> Option<CardanoAddress> {
    let text = text.trim();
    CardanoAddress::from_bech32(text).or_else(|| CardanoAddress::from_hex(text))
}

fn print_address(address: &CardanoAddress, as_json: bool) {
    let text = address.to_bech32(None);
    let credential = |c: Option<&StakeCredential>| {
        c.map(|c| json!({ "kind": c.kind.as_str(), "hash": c.to_hex() }))
    };

    if as_json {
        let out = json!({
            "kind": address.kind().as_str(),
            "network": address.network().0,
            "bech32": text,
            "bytes": hex::encode(address.to_bytes()),
            "payment": credential(address.payment()),
            "stake": credential(address.stake()),
            "extra": hex::encode(address.extra()),
        });
        println!("{}", out);
        return;
    }

    println!("kind:     {}", address.kind());
    println!("network:  {}", address.network());
    if let Some(text) = &text {
        println!("bech32:   {}", text);
    }
    if let Some(payment) = address.payment() {
        println!("payment:  {} {}", payment.kind, payment.to_hex());
    }
    if let Some(stake) = address.stake() {
        println!("stake:    {} {}", stake.kind, stake.to_hex());
    }
    if !address.extra().is_empty() {
        println!("extra:    {}", hex::encode(address.extra()));
    }
    if let Some(reward) = address.stake_address().filter(|_| !address.is_reward()) {
        if let Some(text) = reward.to_bech32(None) {
            println!("reward:   {}", text);
        }
    }
}
