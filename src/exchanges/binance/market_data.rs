use super::types::{DepthSnapshot, ServerTime, TickerPrice};
use super::BinanceClient;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{decode, HttpTransport, RequestParams};
use crate::core::types::Service;
use tracing::instrument;

/// Public market data for Binance
impl<T: HttpTransport> BinanceClient<T> {
    /// Test connectivity
    #[instrument(skip(self), fields(service = %service))]
    pub async fn ping(&self, service: Service) -> Result<(), ExchangeError> {
        self.dispatcher()
            .get(service, service.ping_path(), None, None)
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(service = %service))]
    pub async fn server_time(&self, service: Service) -> Result<ServerTime, ExchangeError> {
        let value = self
            .dispatcher()
            .get(service, service.time_path(), None, None)
            .await?;
        decode(value)
    }

    /// Latest price for a pair given in either order, resolved against the
    /// listing of `service`
    #[instrument(skip(self), fields(service = %service))]
    pub async fn ticker_price(
        &self,
        service: Service,
        from: &str,
        to: &str,
    ) -> Result<TickerPrice, ExchangeError> {
        let symbol = self.resolve_symbol(service, from, to).await?;
        let params = RequestParams::new().with("symbol", symbol);
        let value = self
            .dispatcher()
            .public_get(service, service.ticker_price_path(), &params)
            .await?;
        decode(value)
    }

    /// Order book snapshot for a listed symbol
    #[instrument(skip(self), fields(service = %service, symbol = %symbol))]
    pub async fn depth(
        &self,
        service: Service,
        symbol: &str,
        limit: Option<u32>,
    ) -> Result<DepthSnapshot, ExchangeError> {
        let path = match service {
            Service::Spot => "/api/v3/depth",
            Service::Futures => "/fapi/v1/depth",
        };
        let params = RequestParams::new()
            .with("symbol", symbol)
            .with_opt("limit", limit);
        let value = self.dispatcher().public_get(service, path, &params).await?;
        decode(value)
    }
}
