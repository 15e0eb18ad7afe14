use rust_decimal::Decimal;
use serde::Deserialize;

/// One entry of the full ticker-price listing
#[derive(Debug, Clone, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ServerTime {
    #[serde(rename = "serverTime")]
    pub server_time: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepthSnapshot {
    #[serde(rename = "lastUpdateId")]
    pub last_update_id: u64,
    pub bids: Vec<[String; 2]>,
    pub asks: Vec<[String; 2]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BinanceBalance {
    pub asset: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub free: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub locked: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceAccountInfo {
    pub can_trade: bool,
    pub can_withdraw: bool,
    pub can_deposit: bool,
    pub balances: Vec<BinanceBalance>,
}

impl BinanceAccountInfo {
    /// Balances with a non-zero free or locked amount
    pub fn non_zero_balances(&self) -> impl Iterator<Item = &BinanceBalance> {
        self.balances
            .iter()
            .filter(|b| !b.free.is_zero() || !b.locked.is_zero())
    }
}

/// Order placement acknowledgement; spot and futures share these fields
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceOrderResponse {
    pub symbol: String,
    pub order_id: u64,
    pub client_order_id: String,
    #[serde(default)]
    pub transact_time: Option<u64>,
    #[serde(default)]
    pub update_time: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAccountTransferResponse {
    pub tran_id: u64,
    #[serde(default)]
    pub client_tran_id: Option<String>,
}
