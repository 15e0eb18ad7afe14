use super::converters::{convert_order_side, convert_order_type, convert_time_in_force};
use super::types::BinanceOrderResponse;
use super::BinanceClient;
use crate::core::credentials::CredentialSlot;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{decode, HttpTransport, RequestParams};
use crate::core::types::{OrderSide, OrderType, Price, Quantity, Service, TimeInForce};
use tracing::{error, instrument};

/// New-order parameters. Optional fields that are `None` are left out of the
/// signed request entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderParams {
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Quantity,
    pub price: Option<Price>,
    pub time_in_force: Option<TimeInForce>,
    pub stop_price: Option<Price>,
    pub iceberg_qty: Option<Quantity>,
    pub client_order_id: Option<String>,
}

impl OrderParams {
    pub fn new(
        symbol: impl Into<String>,
        side: OrderSide,
        order_type: OrderType,
        quantity: Quantity,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type,
            quantity,
            price: None,
            time_in_force: None,
            stop_price: None,
            iceberg_qty: None,
            client_order_id: None,
        }
    }

    pub fn market(symbol: impl Into<String>, side: OrderSide, quantity: Quantity) -> Self {
        Self::new(symbol, side, OrderType::Market, quantity)
    }

    pub fn limit(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Quantity,
        price: Price,
    ) -> Self {
        Self::new(symbol, side, OrderType::Limit, quantity).with_price(price)
    }

    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = Some(tif);
        self
    }

    pub fn with_stop_price(mut self, stop_price: Price) -> Self {
        self.stop_price = Some(stop_price);
        self
    }

    pub fn with_iceberg_qty(mut self, iceberg_qty: Quantity) -> Self {
        self.iceberg_qty = Some(iceberg_qty);
        self
    }

    pub fn with_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }

    /// Parameters in wire order. `LIMIT` orders without a time-in-force get `GTC`.
    pub fn to_request_params(&self) -> RequestParams {
        let time_in_force = match (self.order_type, self.time_in_force) {
            (_, Some(tif)) => Some(tif),
            (OrderType::Limit, None) => Some(TimeInForce::GTC),
            (_, None) => None,
        };

        RequestParams::new()
            .with("symbol", &self.symbol)
            .with("side", convert_order_side(self.side))
            .with("type", convert_order_type(self.order_type))
            .with_opt("timeInForce", time_in_force.map(convert_time_in_force))
            .with("quantity", self.quantity)
            .with_opt("price", self.price)
            .with_opt("stopPrice", self.stop_price)
            .with_opt("icebergQty", self.iceberg_qty)
            .with_opt("newClientOrderId", self.client_order_id.as_deref())
    }
}

impl<T: HttpTransport> BinanceClient<T> {
    /// Order parameters for a pair given in either order, with the symbol
    /// taken from the listing of `service`
    pub async fn order_for_pair(
        &self,
        service: Service,
        from: &str,
        to: &str,
        side: OrderSide,
        order_type: OrderType,
        quantity: Quantity,
    ) -> Result<OrderParams, ExchangeError> {
        let symbol = self.resolve_symbol(service, from, to).await?;
        Ok(OrderParams::new(symbol, side, order_type, quantity))
    }

    /// Place an order. Insufficient-balance rejections come back as
    /// `ExchangeError::InsufficientBalance`.
    #[instrument(
        skip(self, order),
        fields(
            service = %service,
            symbol = %order.symbol,
            side = ?order.side,
            order_type = ?order.order_type,
            quantity = %order.quantity
        )
    )]
    pub async fn place_order(
        &self,
        service: Service,
        order: &OrderParams,
        slot: &CredentialSlot,
    ) -> Result<BinanceOrderResponse, ExchangeError> {
        let value = self
            .authenticated_post(service, service.order_path(), order.to_request_params(), slot)
            .await
            .map_err(|e| {
                let e = e.classify_order_rejection();
                error!(symbol = %order.symbol, error = %e, "Order placement failed");
                e
            })?;
        decode(value)
    }

    /// Validate an order without sending it to the matching engine (spot only)
    #[instrument(skip(self, order), fields(symbol = %order.symbol))]
    pub async fn test_order(
        &self,
        order: &OrderParams,
        slot: &CredentialSlot,
    ) -> Result<(), ExchangeError> {
        self.authenticated_post(
            Service::Spot,
            "/api/v3/order/test",
            order.to_request_params(),
            slot,
        )
        .await
        .map_err(ExchangeError::classify_order_rejection)?;
        Ok(())
    }
}
