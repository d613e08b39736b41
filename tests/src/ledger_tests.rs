//! Ledger fold behaviour against persisted snapshots

use proptest::prelude::*;
use rstest::*;
use serde_json::json;
use tempfile::TempDir;
use tracklet_core::{Amount, DataStore, kinds};
use tracklet_exchanges::Wallet;
use tracklet_exchanges::binance::{FiatPayments, Trade, TradingPairs};

// ============================================================================
// FIXTURES
// ============================================================================

struct Snapshots {
    _dir: TempDir,
    store: DataStore,
}

impl Snapshots {
    fn write(&self, kind: &str, value: serde_json::Value) -> &Self {
        self.store.write(kind, &value).unwrap();
        self
    }
}

#[fixture]
fn snapshots() -> Snapshots {
    let dir = tempfile::tempdir().unwrap();
    let store = DataStore::new(dir.path());
    let snapshots = Snapshots { _dir: dir, store };
    snapshots
        .write(kinds::FIAT_PAYMENTS, json!({ "data": [] }))
        .write(kinds::TRADING_HISTORY, json!([]))
        .write(
            kinds::TRADING_PAIRS,
            json!({ "symbols": [{ "symbol": "BTCUSDT", "baseAsset": "BTC", "quoteAsset": "USDT" }] }),
        );
    snapshots
}

fn fiat(status: &str) -> serde_json::Value {
    json!({
        "orderNo": "a1", "sourceAmount": "100", "fiatCurrency": "USD",
        "obtainAmount": "0.01", "cryptoCurrency": "BTC", "totalFee": "0",
        "price": "10000", "status": status, "createTime": 1
    })
}

fn trade(symbol: &str, qty: &str, quote_qty: &str, is_buyer: bool) -> serde_json::Value {
    json!({
        "symbol": symbol, "id": 7, "price": "40000", "qty": qty, "quoteQty": quote_qty,
        "commission": "0", "commissionAsset": "BNB", "isBuyer": is_buyer, "time": 1
    })
}

fn amount(raw: &str) -> Amount {
    Amount::parse(raw).unwrap()
}

// ============================================================================
// FOLD CORRECTNESS
// ============================================================================

#[rstest]
#[monoio::test]
async fn test_completed_fiat_payment(snapshots: Snapshots) {
    snapshots.write(kinds::FIAT_PAYMENTS, json!({ "data": [fiat("Completed")] }));

    let wallet = Wallet::process(&snapshots.store, None).await.unwrap();

    assert_eq!(wallet.holdings.len(), 1);
    assert_eq!(wallet.quantity("BTC"), amount("0.01"));
    assert_eq!(wallet.stats.total_invested, amount("100"));
    assert_eq!(wallet.stats.gain_value, amount("-100"));
}

#[rstest]
#[case("Failed")]
#[case("Processing")]
#[case("completed")]
#[monoio::test]
async fn test_non_completed_fiat_payment(snapshots: Snapshots, #[case] status: &str) {
    snapshots.write(kinds::FIAT_PAYMENTS, json!({ "data": [fiat(status)] }));

    let wallet = Wallet::process(&snapshots.store, None).await.unwrap();

    assert!(wallet.holdings.is_empty());
    assert_eq!(wallet.stats.total_invested, Amount::ZERO);
}

#[rstest]
#[case(true, "0.5", "-20000")]
#[case(false, "-0.5", "20000")]
#[monoio::test]
async fn test_trade_legs(snapshots: Snapshots, #[case] is_buyer: bool, #[case] btc: &str, #[case] usdt: &str) {
    snapshots.write(kinds::TRADING_HISTORY, json!([trade("BTCUSDT", "0.5", "20000", is_buyer)]));

    let wallet = Wallet::process(&snapshots.store, None).await.unwrap();

    assert_eq!(wallet.quantity("BTC"), amount(btc));
    assert_eq!(wallet.quantity("USDT"), amount(usdt));
    assert_eq!(wallet.stats.total_assets, 2);
}

// Records are not deduplicated by id: a trade returned by two windows counts twice.
#[rstest]
#[monoio::test]
async fn test_repeated_trade_id_is_counted_twice(snapshots: Snapshots) {
    let repeated = trade("BTCUSDT", "0.5", "20000", true);
    snapshots.write(kinds::TRADING_HISTORY, json!([repeated.clone(), repeated]));

    let wallet = Wallet::process(&snapshots.store, None).await.unwrap();

    assert_eq!(wallet.quantity("BTC"), amount("1"));
    assert_eq!(wallet.quantity("USDT"), amount("-40000"));
}

#[rstest]
#[monoio::test]
async fn test_unresolved_symbol_posts_to_empty_asset(snapshots: Snapshots) {
    snapshots.write(kinds::TRADING_HISTORY, json!([trade("DOGEEUR", "100", "8", true)]));

    let wallet = Wallet::process(&snapshots.store, None).await.unwrap();

    assert_eq!(wallet.holdings.keys().collect::<Vec<_>>(), vec![""]);
    assert_eq!(wallet.quantity(""), amount("92"));
}

#[rstest]
#[monoio::test]
async fn test_malformed_quantity_aborts(snapshots: Snapshots) {
    snapshots.write(kinds::TRADING_HISTORY, json!([trade("BTCUSDT", "half", "20000", true)]));

    let err = Wallet::process(&snapshots.store, None).await.unwrap_err();
    assert!(err.to_string().contains("qty"));
}

#[rstest]
#[monoio::test]
async fn test_reruns_are_byte_identical(snapshots: Snapshots) {
    snapshots
        .write(kinds::FIAT_PAYMENTS, json!({ "data": [fiat("Completed"), fiat("Completed")] }))
        .write(
            kinds::TRADING_HISTORY,
            json!([trade("BTCUSDT", "0.02", "800", false), trade("BTCUSDT", "0.5", "20000", true)]),
        );

    let first = Wallet::process(&snapshots.store, None).await.unwrap();
    let second = Wallet::process(&snapshots.store, None).await.unwrap();

    assert_eq!(serde_json::to_string(&first).unwrap(), serde_json::to_string(&second).unwrap());
    assert_eq!(first.quantity("BTC"), amount("0.5"));
    assert_eq!(first.quantity("USDT"), amount("-19200"));
    assert_eq!(first.stats.total_invested, amount("200"));
}

// ============================================================================
// PROPERTIES
// ============================================================================

fn pairs() -> TradingPairs {
    serde_json::from_value(json!({ "symbols": [{ "symbol": "BTCUSDT", "baseAsset": "BTC", "quoteAsset": "USDT" }] }))
        .unwrap()
}

fn typed_trade(qty: &str, quote_qty: &str, is_buyer: bool) -> Trade {
    serde_json::from_value(trade("BTCUSDT", qty, quote_qty, is_buyer)).unwrap()
}

proptest! {
    #[test]
    fn test_buy_then_sell_nets_to_zero(qty in 1u64..10_000_000, quote in 1u64..10_000_000) {
        let qty = format!("{}.{:08}", qty / 100_000_000, qty % 100_000_000);
        let quote = quote.to_string();
        let trades = vec![typed_trade(&qty, &quote, true), typed_trade(&qty, &quote, false)];

        let wallet = Wallet::from_history(&FiatPayments::default(), &trades, &pairs())?;

        prop_assert!(wallet.quantity("BTC").is_zero());
        prop_assert!(wallet.quantity("USDT").is_zero());
        prop_assert_eq!(wallet.stats.total_assets, 2);
    }

    #[test]
    fn test_fold_is_deterministic(buys in proptest::collection::vec(any::<bool>(), 0..20)) {
        let trades: Vec<Trade> = buys.iter().map(|&b| typed_trade("0.1", "3000.5", b)).collect();

        let a = Wallet::from_history(&FiatPayments::default(), &trades, &pairs())?;
        let b = Wallet::from_history(&FiatPayments::default(), &trades, &pairs())?;
        prop_assert_eq!(a, b);
    }
}
