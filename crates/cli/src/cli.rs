use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Fetch exchange account history and rebuild a portfolio from it
#[derive(Debug, Parser)]
#[command(name = "tracklet", version, about)]
pub struct Cli {
    /// Configuration file (default: ./config/tracklet.toml, then ~/.tracklet/tracklet.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Binance account history and wallet
    Binance {
        #[command(subcommand)]
        command: BinanceCommand,
    },
    /// KuCoin account history
    Kucoin {
        #[command(subcommand)]
        command: KucoinCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum BinanceCommand {
    /// Fetch every history collection and save it to the data directory
    Process {
        /// Print each collection as it is fetched
        #[arg(short, long)]
        verbose: bool,
    },
    /// Rebuild the wallet from saved history
    Wallet {
        /// Where current prices come from
        #[arg(long, value_enum, default_value_t = PriceProvider::Binance)]
        prices: PriceProvider,

        /// Also save the wallet snapshot as binance_wallet.json
        #[arg(long)]
        save: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum KucoinCommand {
    /// Fetch accounts, deposits and withdrawals and save them
    Process {
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriceProvider {
    Binance,
    Coingecko,
    /// Skip valuation
    None,
}
