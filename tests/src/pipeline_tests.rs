//! Fetch-persist-fold round trip against a fake Binance

use rstest::*;
use std::rc::Rc;
use tracklet_core::{Amount, DataStore, kinds};
use tracklet_exchanges::prelude::*;
use tracklet_exchanges::{BinanceTickerPrices, HttpResponse};
use tracing_subscriber::filter::LevelFilter;
use tracklet_tests::{FakeExchange, LogCapture, binance_client, init_test_logging};

const PAIRS: &str = r#"{"timezone":"UTC","serverTime":1,"symbols":[
    {"symbol":"BTCUSDT","status":"TRADING","baseAsset":"BTC","quoteAsset":"USDT"},
    {"symbol":"ETHBTC","status":"TRADING","baseAsset":"ETH","quoteAsset":"BTC"}]}"#;

const FIAT: &str = r#"{"code":"000000","message":"success","data":[
    {"orderNo":"1","sourceAmount":"20500","fiatCurrency":"EUR","obtainAmount":"20000",
     "cryptoCurrency":"USDT","totalFee":"50","price":"1.0225","status":"Completed","createTime":1}],"total":1}"#;

const BTC_TRADES: &str = r#"[{"symbol":"BTCUSDT","id":1,"orderId":1,"price":"40000","qty":"0.5",
    "quoteQty":"20000","commission":"0","commissionAsset":"BNB","time":2,"isBuyer":true,"isMaker":false}]"#;

const ETH_TRADES: &str = r#"[{"symbol":"ETHBTC","id":2,"orderId":2,"price":"0.05","qty":"2",
    "quoteQty":"0.1","commission":"0","commissionAsset":"BNB","time":3,"isBuyer":true,"isMaker":false}]"#;

fn upstream(url: &str, _call: usize) -> tracklet_exchanges::Result<HttpResponse> {
    let body = if url.contains("/api/v1/exchangeInfo") {
        PAIRS
    } else if url.contains("/sapi/v1/fiat/payments") {
        FIAT
    } else if url.contains("symbol=BTCUSDT") && url.contains("/api/v3/myTrades") {
        BTC_TRADES
    } else if url.contains("symbol=ETHBTC") && url.contains("/api/v3/myTrades") {
        ETH_TRADES
    } else if url.contains("/api/v3/ticker/price") {
        if url.contains("symbol=BTCUSDT") {
            r#"{"symbol":"BTCUSDT","price":"50000"}"#
        } else if url.contains("symbol=ETHUSDT") {
            r#"{"symbol":"ETHUSDT","price":"2500"}"#
        } else {
            return Ok(HttpResponse::new(400, r#"{"code":-1121,"msg":"Invalid symbol."}"#));
        }
    } else if url.contains("/sapi/v1/capital/") {
        "[]"
    } else {
        "{}"
    };
    Ok(HttpResponse::new(200, body))
}

#[fixture]
fn data_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

#[rstest]
#[monoio::test(timer_enabled = true)]
async fn test_process_then_value_wallet(data_dir: tempfile::TempDir) {
    init_test_logging();
    let fake = FakeExchange::new(upstream);
    let store = DataStore::new(data_dir.path());

    // max history 0: one window per history kind
    let data = BinanceProcessor::new(binance_client(&fake, 0, 0), store.clone())
        .process(false)
        .await
        .unwrap();
    assert_eq!(data.trading_history.len(), 2);
    assert_eq!(data.fiat_payments.data.len(), 1);

    let prices = BinanceTickerPrices::new(binance_client(&fake, 0, 0));
    let wallet = Wallet::process(&store, Some(&prices)).await.unwrap();

    // USDT: +20000 fiat -20000 trade = 0 (not valued)
    // BTC: +0.5 -0.1 = 0.4 @ 50000; ETH: 2 @ 2500
    assert!(wallet.quantity("USDT").is_zero());
    assert_eq!(wallet.holdings["BTC"].current_value, Amount::parse("20000").unwrap());
    assert_eq!(wallet.holdings["ETH"].current_value, Amount::parse("5000").unwrap());
    assert_eq!(wallet.stats.total_value, Amount::parse("25000").unwrap());
    assert_eq!(wallet.stats.total_invested, Amount::parse("20500").unwrap());
    assert_eq!(wallet.stats.gain_value, Amount::parse("4500").unwrap());
    assert_eq!(wallet.stats.total_assets, 3);
}

#[rstest]
#[monoio::test(timer_enabled = true)]
async fn test_failed_fetch_leaves_no_snapshots(data_dir: tempfile::TempDir) {
    let (logs, _guard) = LogCapture::start(LevelFilter::ERROR);
    let fake = FakeExchange::new(|url, call| {
        if url.contains("/sapi/v1/capital/withdraw/history") {
            Ok(HttpResponse::new(500, "boom"))
        } else {
            upstream(url, call)
        }
    });
    let store = DataStore::new(data_dir.path());

    let err = BinanceProcessor::new(binance_client(&fake, 2, 0), store.clone())
        .process(false)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("/sapi/v1/capital/withdraw/history"));
    assert!(!store.exists(kinds::TRADING_PAIRS));
    assert!(!store.exists(kinds::FIAT_PAYMENTS));

    let failures: Vec<String> = logs.lines().into_iter().filter(|l| l.contains("failed:")).collect();
    assert_eq!(failures.len(), 1, "{failures:?}");
    assert!(failures[0].contains("Binance fetch failed"));
}

#[rstest]
#[monoio::test(timer_enabled = true)]
async fn test_wallet_snapshot_can_be_saved(data_dir: tempfile::TempDir) {
    let fake: Rc<FakeExchange> = FakeExchange::new(upstream);
    let store = DataStore::new(data_dir.path());
    BinanceProcessor::new(binance_client(&fake, 0, 0), store.clone())
        .process(false)
        .await
        .unwrap();

    let wallet = Wallet::process(&store, None).await.unwrap();
    store.write(kinds::BINANCE_WALLET, &wallet).unwrap();

    let back: Wallet = store.read(kinds::BINANCE_WALLET).unwrap();
    assert_eq!(back, wallet);
    assert_eq!(back.stats.total_value, Amount::ZERO);
}
