//! Binance account-history fetchers
//!
//! History endpoints are capped per query, so they walk the configured look-back
//! in 15-day windows and concatenate whatever each window returns. Trades are
//! fetched per symbol instead, capped at 1000 fills per symbol.

use crate::auth::{Credentials, NoAuth};
use crate::binance::auth::BinanceSigner;
use crate::binance::types::{
    DepositHistory, DividendHistory, DustConversion, FiatPayments, PageRecords, ServerTime,
    TickerPrice, TradingHistory, TradingPairs, WithdrawHistory,
};
use crate::client::{ClientConfig, RestClient};
use crate::errors::Result;
use tracklet_core::config::{ExchangeSettings, GeneralSettings};
use tracklet_core::paging::{WINDOW_DAYS, date_ranges};
use tracklet_core::PerfTimer;

use tracing::{debug, info};

pub const API_BASE_URL: &str = "https://api.binance.com";

/// Binance REST paths
pub mod endpoints {
    pub const SERVER_TIME: &str = "/api/v3/time";
    pub const TRADING_PAIRS: &str = "/api/v1/exchangeInfo";
    pub const TICKER_PRICE: &str = "/api/v3/ticker/price";
    pub const FIAT_PAYMENTS: &str = "/sapi/v1/fiat/payments";
    pub const TRADING_HISTORY: &str = "/api/v3/myTrades";
    pub const DUST_CONVERSION: &str = "/sapi/v1/asset/dribblet";
    pub const DIVIDEND_HISTORY: &str = "/sapi/v1/asset/assetDividend";
    pub const DEPOSIT_HISTORY: &str = "/sapi/v1/capital/deposit/hisrec";
    pub const WITHDRAW_HISTORY: &str = "/sapi/v1/capital/withdraw/history";
}

/// Maximum fills returned per symbol
pub const TRADES_LIMIT: &str = "1000";

/// Binance REST client for account history
pub struct BinanceRestClient {
    client: RestClient,
    include_pairs: Vec<String>,
}

impl BinanceRestClient {
    /// Signed client from configuration; fails without key and secret.
    pub fn new(general: &GeneralSettings, settings: &ExchangeSettings) -> Result<Self> {
        let credentials = Credentials::from_settings("binance", settings)?;
        let config = ClientConfig::from_settings(general, &settings.api_base_url);

        info!("Initializing Binance client...");
        debug!(base_url = %config.base_url, max_history = config.max_history_days, "binance client config");

        let client = RestClient::new(config, Box::new(BinanceSigner::new(credentials)))?;
        Ok(Self::from_client(client).with_include_pairs(settings.include_pairs.clone()))
    }

    /// Unsigned client for market-data endpoints; needs no credentials.
    pub fn public(general: &GeneralSettings, settings: &ExchangeSettings) -> Result<Self> {
        let config = ClientConfig::from_settings(general, &settings.api_base_url);
        Ok(Self::from_client(RestClient::new(config, Box::new(NoAuth))?))
    }

    pub fn from_client(client: RestClient) -> Self {
        Self {
            client,
            include_pairs: Vec::new(),
        }
    }

    /// Restrict trading pairs (and therefore trade history) to these symbols
    pub fn with_include_pairs(mut self, include_pairs: Vec<String>) -> Self {
        self.include_pairs = include_pairs;
        self
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }

    /// Concatenate one page per date window, most recent first.
    async fn fetch_history<T: PageRecords>(
        &self,
        kind: &str,
        endpoint: &str,
        start_key: &str,
        extra: &[(&str, &str)],
    ) -> Result<T> {
        let timer = PerfTimer::start(kind);
        let mut records = T::default();

        let ranges = date_ranges(self.client.config().max_history_days, WINDOW_DAYS as u32);
        for range in &ranges {
            let start = range.start.to_string();
            let end = range.end.to_string();

            let mut params: Vec<(&str, &str)> = vec![(start_key, start.as_str()), ("endTime", end.as_str())];
            params.extend_from_slice(extra);

            let page: T = self.client.fetch_json(kind, endpoint, &params).await?;
            if !page.is_empty() {
                debug!(kind, start = range.start, end = range.end, records = page.len(), "page");
                records.append(page);
            }
        }

        info!(kind, windows = ranges.len(), records = records.len(), "fetched");
        timer.log_elapsed();
        Ok(records)
    }

    /// Connectivity check
    pub async fn server_time(&self) -> Result<ServerTime> {
        self.client
            .fetch_public_json("server_time", endpoints::SERVER_TIME, &[])
            .await
    }

    /// Every symbol listed on the exchange, filtered by `include_pairs`.
    pub async fn trading_pairs(&self) -> Result<TradingPairs> {
        let mut pairs: TradingPairs = self
            .client
            .fetch_public_json("trading_pairs", endpoints::TRADING_PAIRS, &[])
            .await?;
        pairs.retain_symbols(&self.include_pairs);

        info!(pairs = pairs.symbols.len(), "fetched trading pairs");
        Ok(pairs)
    }

    /// Current price of one symbol
    pub async fn ticker_price(&self, symbol: &str) -> Result<TickerPrice> {
        self.client
            .fetch_public_json("ticker_price", endpoints::TICKER_PRICE, &[("symbol", symbol)])
            .await
    }

    /// Fiat card purchases
    pub async fn fiat_payments(&self) -> Result<FiatPayments> {
        self.fetch_history(
            "fiat_payments",
            endpoints::FIAT_PAYMENTS,
            "beginTime",
            &[("transactionType", "0"), ("rows", "500")],
        )
        .await
    }

    /// Fills for every pair, one request per symbol
    pub async fn trading_history(&self, pairs: &TradingPairs) -> Result<TradingHistory> {
        let timer = PerfTimer::start("trading_history");
        let mut history = TradingHistory::new();

        for pair in &pairs.symbols {
            let mut trades: TradingHistory = self
                .client
                .fetch_json(
                    "trading_history",
                    endpoints::TRADING_HISTORY,
                    &[("symbol", pair.symbol.as_str()), ("limit", TRADES_LIMIT)],
                )
                .await?;

            if !trades.is_empty() {
                debug!(symbol = %pair.symbol, trades = trades.len(), "trades");
                history.append(&mut trades);
            }
        }

        info!(symbols = pairs.symbols.len(), records = history.len(), "fetched trading_history");
        timer.log_elapsed();
        Ok(history)
    }

    pub async fn dust_conversion(&self) -> Result<DustConversion> {
        self.fetch_history("dust_conversion", endpoints::DUST_CONVERSION, "startTime", &[])
            .await
    }

    /// Staking rewards and other distributions
    pub async fn dividend_history(&self) -> Result<DividendHistory> {
        self.fetch_history(
            "dividend_history",
            endpoints::DIVIDEND_HISTORY,
            "startTime",
            &[("limit", "500")],
        )
        .await
    }

    /// Successful deposits (`status=1`)
    pub async fn deposit_history(&self) -> Result<DepositHistory> {
        self.fetch_history(
            "deposit_history",
            endpoints::DEPOSIT_HISTORY,
            "startTime",
            &[("status", "1"), ("limit", "1000")],
        )
        .await
    }

    /// Completed withdrawals (`status=6`)
    pub async fn withdraw_history(&self) -> Result<WithdrawHistory> {
        self.fetch_history(
            "withdraw_history",
            endpoints::WITHDRAW_HISTORY,
            "startTime",
            &[("status", "6"), ("limit", "1000")],
        )
        .await
    }
}
