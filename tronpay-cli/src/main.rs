//! Tronpay CLI - send TRC20 tokens from the command line.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use tronpay::prelude::*;

/// Signature layout accepted by the target node.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum SigFormat {
    /// 64-byte `r || s`
    #[default]
    Compact,
    /// 65-byte `r || s || v`
    Recoverable,
}

impl From<SigFormat> for SignatureFormat {
    fn from(format: SigFormat) -> Self {
        match format {
            SigFormat::Compact => Self::Compact,
            SigFormat::Recoverable => Self::Recoverable,
        }
    }
}

/// Tronpay - TRC20 transfers on TRON
#[derive(Parser, Debug)]
#[command(name = "tronpay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Sender private key (hex)
    #[arg(long, env = "TRONPAY_PRIVATE_KEY", hide_env_values = true, global = true)]
    private_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send tokens and print the result as JSON
    Send(SendArgs),
    /// Print the sender address derived from the private key
    Address,
}

#[derive(Args, Debug)]
struct SendArgs {
    /// Recipient address (base58check)
    #[arg(long)]
    to: String,

    /// Amount in whole tokens, e.g. 10.5
    #[arg(long)]
    amount: String,

    /// Full-node HTTP API base URL
    #[arg(long, env = "TRONPAY_NODE_URL", default_value = tronpay::config::TRONGRID_MAINNET_URL)]
    node_url: String,

    /// TRC20 contract address
    #[arg(long, env = "TRONPAY_CONTRACT", default_value = tronpay::config::USDT_CONTRACT)]
    contract: String,

    /// Token decimal precision
    #[arg(long, env = "TRONPAY_DECIMALS", default_value_t = tronpay::config::DEFAULT_DECIMALS)]
    decimals: u8,

    /// Energy fee ceiling in sun
    #[arg(long, env = "TRONPAY_FEE_LIMIT", default_value_t = tronpay::config::DEFAULT_FEE_LIMIT)]
    fee_limit: u64,

    /// Per-request timeout in seconds
    #[arg(long, env = "TRONPAY_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// TronGrid API key
    #[arg(long, env = "TRONPAY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Signature layout expected by the node
    #[arg(long, value_enum, default_value_t = SigFormat::Compact)]
    signature_format: SigFormat,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tronpay=debug,tronpay_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tronpay=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn build_config(args: &SendArgs) -> tronpay::Result<TransferConfig> {
    let mut builder = TransferConfig::builder()
        .node_url(&args.node_url)
        .contract(&args.contract)
        .decimals(args.decimals)
        .fee_limit(args.fee_limit)
        .timeout(Duration::from_secs(args.timeout_secs))
        .signature_format(args.signature_format.into());
    if let Some(key) = &args.api_key {
        builder = builder.api_key(key);
    }
    builder.build()
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let private_key = cli
        .private_key
        .ok_or_else(|| anyhow::anyhow!("--private-key or TRONPAY_PRIVATE_KEY is required"))?;

    match cli.command {
        Commands::Address => {
            let address = owner_address(&private_key)?;
            println!("{address}");
            println!("{}", address.to_hex());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Send(args) => {
            let response = match build_config(&args).and_then(Trc20Sender::new) {
                Ok(sender) => {
                    tracing::debug!(config = ?sender.config(), "sender ready");
                    sender
                        .handle(TransferRequest {
                            private_key,
                            to_address: args.to,
                            amount: args.amount,
                        })
                        .await
                }
                Err(e) => TransferResponse::err(e.to_string()),
            };

            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(if response.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
