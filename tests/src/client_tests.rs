//! Retry bound and signing properties of the shared REST client

use proptest::prelude::*;
use rstest::*;
use tracklet_exchanges::prelude::*;
use tracklet_exchanges::{BinanceSigner, sign_base64, sign_hex};
use tracing_subscriber::filter::LevelFilter;
use tracklet_tests::{FakeExchange, LogCapture, binance_client, fast_config, init_test_logging};

// ============================================================================
// RETRY BOUND
// ============================================================================

#[rstest]
#[case(0)]
#[case(1)]
#[case(3)]
#[case(10)]
#[monoio::test(timer_enabled = true)]
async fn test_always_failing_endpoint(#[case] max_retries: u32) {
    init_test_logging();
    let fake = FakeExchange::new(|_, _| Ok(HttpResponse::new(503, "down")));
    let client = RestClient::with_transport(fast_config(max_retries, 365), Box::new(NoAuth), Box::new(fake.clone()))
        .unwrap();

    let err = client.fetch("/api/v3/myTrades", &[("symbol", "BTCUSDT")]).await.unwrap_err();

    assert_eq!(fake.calls(), max_retries as usize + 1);
    assert!(matches!(err, ExchangeError::RequestFailed { ref endpoint, .. } if endpoint == "/api/v3/myTrades"));
}

#[rstest]
#[case(1, 10)]
#[case(5, 10)]
#[case(11, 10)]
#[case(3, 2)]
#[monoio::test(timer_enabled = true)]
async fn test_success_on_attempt_k(#[case] attempt: usize, #[case] max_retries: u32) {
    let fake = FakeExchange::flaky(attempt - 1, 500, "[]");
    let client = RestClient::with_transport(fast_config(max_retries, 365), Box::new(NoAuth), Box::new(fake.clone()))
        .unwrap();

    let body = client.fetch("/sapi/v1/capital/deposit/hisrec", &[]).await.unwrap();

    assert_eq!(body, b"[]");
    assert_eq!(fake.calls(), attempt);
}

#[monoio::test(timer_enabled = true)]
async fn test_attempt_beyond_bound_fails() {
    let fake = FakeExchange::flaky(3, 429, "[]");
    let client = RestClient::with_transport(fast_config(2, 365), Box::new(NoAuth), Box::new(fake.clone())).unwrap();

    assert!(client.fetch("/api/v3/time", &[]).await.is_err());
    assert_eq!(fake.calls(), 3);
}

#[rstest]
#[case(0, 1)]
#[case(3, 1)]
#[case(3, 4)]
#[monoio::test(timer_enabled = true)]
async fn test_one_warning_per_retry(#[case] max_retries: u32, #[case] attempt: usize) {
    let (logs, _guard) = LogCapture::start(LevelFilter::WARN);
    let fake = FakeExchange::flaky(attempt - 1, 503, "[]");
    let client = RestClient::with_transport(fast_config(max_retries, 365), Box::new(NoAuth), Box::new(fake.clone()))
        .unwrap();

    client.fetch("/api/v3/time", &[]).await.unwrap();

    let warnings: Vec<String> = logs.lines().into_iter().filter(|l| l.contains("Retrying...")).collect();
    assert_eq!(warnings.len(), attempt - 1);
    for (i, line) in warnings.iter().enumerate() {
        assert!(line.contains("WARN"), "{line}");
        assert!(line.contains(&format!("[{}/{max_retries}]", i + 1)), "{line}");
    }
}

#[monoio::test(timer_enabled = true)]
async fn test_exhausted_retries_warn_up_to_max() {
    let (logs, _guard) = LogCapture::start(LevelFilter::WARN);
    let fake = FakeExchange::new(|_, _| Ok(HttpResponse::new(503, "down")));
    let client = RestClient::with_transport(fast_config(2, 365), Box::new(NoAuth), Box::new(fake.clone())).unwrap();

    assert!(client.fetch("/api/v3/time", &[]).await.is_err());

    let warnings = logs.lines().into_iter().filter(|l| l.contains("Retrying...")).count();
    assert_eq!(warnings, 2);
    assert_eq!(fake.calls(), 3);
}

#[monoio::test(timer_enabled = true)]
async fn test_each_retry_is_signed_fresh() {
    let fake = FakeExchange::flaky(2, 502, "[]");
    let client = binance_client(&fake, 5, 365);

    client.client().fetch("/api/v3/myTrades", &[("symbol", "ETHBTC")]).await.unwrap();

    for url in fake.urls() {
        assert_eq!(url.matches("signature=").count(), 1);
        assert_eq!(url.matches("timestamp=").count(), 1);
        assert!(url.rsplit('&').next().unwrap().starts_with("signature="));
    }
}

// ============================================================================
// SIGNATURE DETERMINISM
// ============================================================================

proptest! {
    #[test]
    fn test_hex_signature_is_pure(secret in "[a-zA-Z0-9]{1,64}", message in ".{0,200}") {
        let first = sign_hex(&secret, &message)?;
        let second = sign_hex(&secret, &message)?;
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_base64_signature_is_pure(secret in "[a-zA-Z0-9]{1,64}", message in ".{0,200}") {
        prop_assert_eq!(sign_base64(&secret, &message)?, sign_base64(&secret, &message)?);
    }

    #[test]
    fn test_binance_signature_independent_of_param_order(a in 0u64..1_000_000, b in 0u64..1_000_000) {
        let signer = BinanceSigner::new(Credentials::new("key", "secret")).with_clock(|| 1_700_000_000_000);
        let (a, b) = (a.to_string(), b.to_string());

        let mut forward = PreparedRequest::get("/sapi/v1/asset/dribblet", &[("startTime", a.as_str()), ("endTime", b.as_str())]);
        let mut reverse = PreparedRequest::get("/sapi/v1/asset/dribblet", &[("endTime", b.as_str()), ("startTime", a.as_str())]);
        signer.authenticate(&mut forward)?;
        signer.authenticate(&mut reverse)?;

        prop_assert_eq!(forward.query_string(), reverse.query_string());
    }
}
