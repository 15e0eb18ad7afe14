use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TypesError {
    #[error("Invalid asset code: {0}")]
    InvalidAsset(String),
    #[error("Invalid decimal: {0}")]
    InvalidDecimal(#[from] rust_decimal::Error),
}

/// API surface a request targets; each has its own base URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Spot,
    Futures,
}

impl Service {
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Spot => "https://api.binance.com",
            Self::Futures => "https://fapi.binance.com",
        }
    }

    pub const fn testnet_base_url(self) -> &'static str {
        match self {
            Self::Spot => "https://testnet.binance.vision",
            Self::Futures => "https://testnet.binancefuture.com",
        }
    }

    /// Path of the full ticker-price listing for this service
    pub const fn ticker_price_path(self) -> &'static str {
        match self {
            Self::Spot => "/api/v3/ticker/price",
            Self::Futures => "/fapi/v1/ticker/price",
        }
    }

    pub const fn order_path(self) -> &'static str {
        match self {
            Self::Spot => "/api/v3/order",
            Self::Futures => "/fapi/v1/order",
        }
    }

    pub const fn ping_path(self) -> &'static str {
        match self {
            Self::Spot => "/api/v3/ping",
            Self::Futures => "/fapi/v1/ping",
        }
    }

    pub const fn time_path(self) -> &'static str {
        match self {
            Self::Spot => "/api/v3/time",
            Self::Futures => "/fapi/v1/time",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spot => f.write_str("spot"),
            Self::Futures => f.write_str("futures"),
        }
    }
}

/// A user's intended market, independent of the exchange's base/quote order.
///
/// Both asset codes are trimmed and uppercased on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradePair {
    from: String,
    to: String,
}

impl TradePair {
    pub fn new(from: impl AsRef<str>, to: impl AsRef<str>) -> Result<Self, TypesError> {
        let from = normalize_asset(from.as_ref())?;
        let to = normalize_asset(to.as_ref())?;
        Ok(Self { from, to })
    }

    pub fn from_asset(&self) -> &str {
        &self.from
    }

    pub fn to_asset(&self) -> &str {
        &self.to
    }

    /// Both concatenations a canonical symbol could take: `(from+to, to+from)`
    pub fn candidates(&self) -> (String, String) {
        (
            format!("{}{}", self.from, self.to),
            format!("{}{}", self.to, self.from),
        )
    }
}

/// Characters that would break out of a query value or a symbol
const RESERVED: &[char] = &['&', '=', '?', '#', '%', '+', '/'];

fn normalize_asset(code: &str) -> Result<String, TypesError> {
    let code = code.trim();
    if code.is_empty()
        || code
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || RESERVED.contains(&c))
    {
        return Err(TypesError::InvalidAsset(code.to_string()));
    }
    Ok(code.to_uppercase())
}

impl fmt::Display for TradePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.from, self.to)
    }
}

/// Type-safe price representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::str")] pub Decimal);

impl Price {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl std::str::FromStr for Price {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// Type-safe quantity representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(#[serde(with = "rust_decimal::serde::str")] pub Decimal);

impl Quantity {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl std::str::FromStr for Quantity {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Market,
    Limit,
    StopLoss,
    StopLossLimit,
    TakeProfit,
    TakeProfitLimit,
    LimitMaker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    GTC, // Good Till Canceled
    IOC, // Immediate or Cancel
    FOK, // Fill or Kill
}
