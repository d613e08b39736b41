use anyhow::{Context, Result};
use tracing::info;
use tracklet_core::output::print_json;
use tracklet_core::{DataStore, TrackletConfig, kinds};
use tracklet_exchanges::{
    BinanceProcessor, BinanceRestClient, BinanceTickerPrices, CoinGeckoPriceSource, KucoinProcessor,
    KucoinRestClient, PriceSource, Wallet,
};

use crate::cli::{BinanceCommand, Command, KucoinCommand, PriceProvider};

pub async fn run(command: Command, config: &TrackletConfig) -> Result<()> {
    let store = DataStore::new(config.data_dir()?);

    match command {
        Command::Binance { command } => match command {
            BinanceCommand::Process { verbose } => binance_process(config, store, verbose).await,
            BinanceCommand::Wallet { prices, save } => binance_wallet(config, &store, prices, save).await,
        },
        Command::Kucoin { command } => match command {
            KucoinCommand::Process { verbose } => kucoin_process(config, store, verbose).await,
        },
    }
}

async fn binance_process(config: &TrackletConfig, store: DataStore, verbose: bool) -> Result<()> {
    let client = BinanceRestClient::new(&config.tracklet, &config.exchanges.binance)?;
    let data = BinanceProcessor::new(client, store)
        .process(verbose)
        .await
        .context("Binance processing failed")?;

    info!(
        pairs = data.trading_pairs.symbols.len(),
        trades = data.trading_history.len(),
        "Binance data saved"
    );
    Ok(())
}

async fn binance_wallet(
    config: &TrackletConfig,
    store: &DataStore,
    provider: PriceProvider,
    save: bool,
) -> Result<()> {
    let prices: Option<Box<dyn PriceSource>> = match provider {
        PriceProvider::Binance => Some(Box::new(BinanceTickerPrices::new(BinanceRestClient::public(
            &config.tracklet,
            &config.exchanges.binance,
        )?))),
        PriceProvider::Coingecko => Some(Box::new(CoinGeckoPriceSource::new(
            &config.tracklet,
            &config.aggregators.coingecko,
        )?)),
        PriceProvider::None => None,
    };

    let wallet = Wallet::process(store, prices.as_deref())
        .await
        .with_context(|| format!("could not build wallet from {}", store.root().display()))?;

    print_json(&wallet)?;

    if save {
        store.write(kinds::BINANCE_WALLET, &wallet)?;
    }
    Ok(())
}

async fn kucoin_process(config: &TrackletConfig, store: DataStore, verbose: bool) -> Result<()> {
    let client = KucoinRestClient::new(&config.tracklet, &config.exchanges.kucoin)?;
    KucoinProcessor::new(client, store)
        .process(verbose)
        .await
        .context("KuCoin processing failed")?;

    info!("KuCoin data saved");
    Ok(())
}
