//! Authenticated REST core for the Binance spot and futures APIs.
//!
//! Credentials are resolved per call, requests are signed over an
//! insertion-ordered query string, and every response is classified into a
//! JSON payload or a single [`ExchangeError`]. Symbol lookups go through a
//! lazily populated, single-flight [`SymbolCache`] per service.
pub mod core;
pub mod exchanges;

pub use crate::core::{
    config::ClientConfig,
    credentials::{CredentialSlot, Credentials},
    errors::ExchangeError,
    kernel::RequestParams,
    types::*,
};
pub use exchanges::binance::{BinanceClient, OrderParams, SymbolCache, SymbolCaches};
