use mbx_rest::{BinanceClient, ClientConfig, Service};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // BINANCE_API_KEY / BINANCE_SECRET_KEY are only needed for signed calls
    #[cfg(feature = "env-file")]
    let config = ClientConfig::from_env_file()?;
    #[cfg(not(feature = "env-file"))]
    let config = ClientConfig::from_env()?;
    let client = BinanceClient::new(config)?;

    client.ping(Service::Spot).await?;
    let time = client.server_time(Service::Spot).await?;
    info!(server_time = time.server_time, "Connected");

    let mut args = std::env::args().skip(1);
    let from = args.next().unwrap_or_else(|| "ETH".to_string());
    let to = args.next().unwrap_or_else(|| "BTC".to_string());

    let ticker = client.ticker_price(Service::Spot, &from, &to).await?;
    println!("{} = {}", ticker.symbol, ticker.price);

    Ok(())
}
