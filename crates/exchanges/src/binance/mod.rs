//! Binance account-history integration
//!
//! [`BinanceProcessor`] fetches every supported collection in a fixed order and
//! persists them only once all of them succeeded.

pub mod auth;
pub mod prices;
pub mod rest;
pub mod types;

use crate::errors::Result;
use crate::show;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracklet_core::{DataStore, PerfTimer, kinds, log_error};

pub use auth::BinanceSigner;
pub use prices::BinanceTickerPrices;
pub use rest::BinanceRestClient;
pub use types::*;

/// Everything fetched in one Binance run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BinanceData {
    pub trading_pairs: TradingPairs,
    pub fiat_payments: FiatPayments,
    pub trading_history: TradingHistory,
    pub dust_conversion: DustConversion,
    pub dividend_history: DividendHistory,
    pub deposit_history: DepositHistory,
    pub withdraw_history: WithdrawHistory,
}

/// Fetch-then-persist pipeline for Binance
pub struct BinanceProcessor {
    client: BinanceRestClient,
    store: DataStore,
}

impl BinanceProcessor {
    pub fn new(client: BinanceRestClient, store: DataStore) -> Self {
        Self { client, store }
    }

    /// Fetch all collections, stopping at the first failure.
    pub async fn fetch_all(&self, verbose: bool) -> Result<BinanceData> {
        info!("Fetching trading pairs data...");
        let trading_pairs = self.client.trading_pairs().await?;

        info!("Fetching fiat payments history data...");
        let fiat_payments = self.client.fiat_payments().await?;
        show(verbose, &fiat_payments)?;

        info!("Fetching trading history data...");
        let trading_history = self.client.trading_history(&trading_pairs).await?;
        show(verbose, &trading_history)?;

        info!("Fetching dust conversion history data...");
        let dust_conversion = self.client.dust_conversion().await?;
        show(verbose, &dust_conversion)?;

        info!("Fetching dividend history data...");
        let dividend_history = self.client.dividend_history().await?;
        show(verbose, &dividend_history)?;

        info!("Fetching deposit history data...");
        let deposit_history = self.client.deposit_history().await?;
        show(verbose, &deposit_history)?;

        info!("Fetching withdraw history data...");
        let withdraw_history = self.client.withdraw_history().await?;
        show(verbose, &withdraw_history)?;

        Ok(BinanceData {
            trading_pairs,
            fiat_payments,
            trading_history,
            dust_conversion,
            dividend_history,
            deposit_history,
            withdraw_history,
        })
    }

    /// Write every collection under its data kind. Either all snapshots are
    /// replaced or none are.
    pub fn save(&self, data: &BinanceData) -> Result<Vec<PathBuf>> {
        let mut batch = self.store.batch();
        batch
            .stage(kinds::TRADING_PAIRS, &data.trading_pairs)?
            .stage(kinds::FIAT_PAYMENTS, &data.fiat_payments)?
            .stage(kinds::TRADING_HISTORY, &data.trading_history)?
            .stage(kinds::DUST_CONVERSION, &data.dust_conversion)?
            .stage(kinds::DIVIDEND_HISTORY, &data.dividend_history)?
            .stage(kinds::DEPOSIT_HISTORY, &data.deposit_history)?
            .stage(kinds::WITHDRAW_HISTORY, &data.withdraw_history)?;
        Ok(batch.commit()?)
    }

    pub async fn process(&self, verbose: bool) -> Result<BinanceData> {
        info!("Starting process Binance data...");
        let timer = PerfTimer::start("binance_process");

        let data = self
            .fetch_all(verbose)
            .await
            .inspect_err(|e| { log_error!("Binance fetch", e); })?;
        self.save(&data)
            .inspect_err(|e| { log_error!("Binance save", e); })?;

        timer.log_elapsed();
        Ok(data)
    }
}
