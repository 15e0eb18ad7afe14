mod common;

use common::TestConfig;
use mbx_rest::{BinanceClient, ClientConfig, Service};
use tokio::time::timeout;

/// Public endpoints only; no credentials are needed. Set `RUN_LIVE_TESTS=true`.
#[tokio::test]
async fn test_live_spot_ping_and_symbol_resolution() {
    if !TestConfig::should_run_live_tests() {
        println!("Skipping live test (set RUN_LIVE_TESTS=true to enable)");
        return;
    }

    let client = BinanceClient::new(ClientConfig::read_only()).unwrap();

    timeout(TestConfig::test_timeout(), client.ping(Service::Spot))
        .await
        .expect("ping timed out")
        .unwrap();

    let time = timeout(TestConfig::test_timeout(), client.server_time(Service::Spot))
        .await
        .expect("server time timed out")
        .unwrap();
    assert!(time.server_time > 0);

    let symbol = timeout(TestConfig::test_timeout(), client.resolve_symbol(Service::Spot, "btc", "eth"))
        .await
        .expect("symbol resolution timed out")
        .unwrap();
    assert_eq!(symbol, "ETHBTC");

    let ticker = timeout(
        TestConfig::test_timeout(),
        client.ticker_price(Service::Spot, "eth", "btc"),
    )
    .await
    .expect("ticker timed out")
    .unwrap();
    assert_eq!(ticker.symbol, "ETHBTC");
    assert!(ticker.price > rust_decimal::Decimal::ZERO);
}

#[tokio::test]
async fn test_live_futures_ping() {
    if !TestConfig::should_run_live_tests() {
        println!("Skipping live test (set RUN_LIVE_TESTS=true to enable)");
        return;
    }

    let client = BinanceClient::new(ClientConfig::read_only()).unwrap();
    timeout(TestConfig::test_timeout(), client.ping(Service::Futures))
        .await
        .expect("ping timed out")
        .unwrap();
}
