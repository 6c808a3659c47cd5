//! Blackhole command line: runs the ledger and sink factory in an in-memory world.

mod config;
mod scenario;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use blackhole_types::{ChainId, NativeAmount};
use blackhole_utils::LogFormat;

use crate::config::DaemonConfig;

#[derive(Parser)]
#[command(name = "blackhole", about = "Blackhole token and sink factory")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "BLACKHOLE_CONFIG")]
    config: Option<PathBuf>,

    /// Chain identifier bound into permit signatures.
    #[arg(long, env = "BLACKHOLE_CHAIN_ID")]
    chain_id: Option<u64>,

    /// Log output: "human" or "json".
    #[arg(long, env = "BLACKHOLE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "BLACKHOLE_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Deploy, hand ownership to the factory and send value into it.
    Demo {
        /// Account that sends value to the factory.
        #[arg(long, default_value = "deployer")]
        from: String,

        /// Whole coins to send.
        #[arg(long, default_value_t = 1)]
        value: u64,

        /// Have the sender permit this account to pull the minted credit.
        #[arg(long)]
        permit_to: Option<String>,
    },
    /// Print the effective configuration as TOML.
    Config,
    /// Print the address of a configured account.
    Address { name: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DaemonConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => DaemonConfig::default(),
    };
    if let Some(chain_id) = cli.chain_id {
        config.chain_id = ChainId::new(chain_id);
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    blackhole_utils::init_logging(config.log_format, &config.log_level);
    tracing::debug!(chain_id = %config.chain_id, "configuration loaded");

    match cli.command {
        Command::Demo {
            from,
            value,
            permit_to,
        } => {
            let value = NativeAmount::from_whole(value).context("value too large")?;
            let report = scenario::run_demo(&config, &from, value, permit_to.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Address { name } => {
            let account = config.account(&name)?;
            println!("{}", scenario::account_address(&account.name));
        }
    }

    Ok(())
}
