pub mod account;
pub mod converters;
pub mod market_data;
pub mod sub_account;
pub mod symbols;
pub mod trading;
pub mod types;

use crate::core::config::ClientConfig;
use crate::core::credentials::{self, CredentialSlot, Credentials};
use crate::core::errors::ExchangeError;
use crate::core::kernel::{HttpTransport, RequestParams, ReqwestTransport, RestDispatcher};
use crate::core::types::{Service, TradePair};
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

pub use sub_account::SubAccountTransfer;
pub use symbols::{CacheError, SymbolCache, SymbolCaches, SymbolResolver, SymbolSet};
pub use trading::OrderParams;
pub use types::{
    BinanceAccountInfo, BinanceBalance, BinanceOrderResponse, DepthSnapshot, ServerTime,
    SubAccountTransferResponse, TickerPrice,
};

/// Composition root: owns the dispatcher and one symbol resolver per service
/// and hands out the authenticated primitives endpoint wrappers are built on.
pub struct BinanceClient<T = ReqwestTransport> {
    dispatcher: Arc<RestDispatcher<T>>,
    spot: SymbolResolver<T>,
    futures: SymbolResolver<T>,
}

impl BinanceClient<ReqwestTransport> {
    /// Client over reqwest with fresh symbol caches
    pub fn new(config: ClientConfig) -> Result<Self, ExchangeError> {
        let dispatcher = RestDispatcher::from_config(Arc::new(config))?;
        Ok(Self::from_dispatcher(dispatcher, &SymbolCaches::new()))
    }
}

impl<T: HttpTransport> BinanceClient<T> {
    /// Client over a caller-supplied transport, sharing `caches`
    pub fn with_transport(
        transport: T,
        config: ClientConfig,
        caches: &SymbolCaches,
    ) -> Result<Self, ExchangeError> {
        config.validate()?;
        let dispatcher = RestDispatcher::new(transport, Arc::new(config));
        Ok(Self::from_dispatcher(dispatcher, caches))
    }

    fn from_dispatcher(dispatcher: RestDispatcher<T>, caches: &SymbolCaches) -> Self {
        let dispatcher = Arc::new(dispatcher);
        let resolver = |service: Service| {
            SymbolResolver::new(
                Arc::clone(&dispatcher),
                Arc::clone(caches.for_service(service)),
                service,
            )
        };
        Self {
            spot: resolver(Service::Spot),
            futures: resolver(Service::Futures),
            dispatcher,
        }
    }

    const fn resolver(&self, service: Service) -> &SymbolResolver<T> {
        match service {
            Service::Spot => &self.spot,
            Service::Futures => &self.futures,
        }
    }

    pub fn dispatcher(&self) -> &RestDispatcher<T> {
        &self.dispatcher
    }

    pub fn symbol_cache(&self, service: Service) -> &Arc<SymbolCache> {
        self.resolver(service).cache()
    }

    /// Resolve the credentials for `slot` from the current configuration
    pub fn credentials(&self, slot: &CredentialSlot) -> Result<Credentials, ExchangeError> {
        credentials::resolve(self.dispatcher.config(), slot)
    }

    /// Signed GET using the credentials in `slot`
    #[instrument(skip(self, params), fields(service = %service, path = %path))]
    pub async fn authenticated_get(
        &self,
        service: Service,
        path: &str,
        params: RequestParams,
        slot: &CredentialSlot,
    ) -> Result<Value, ExchangeError> {
        let credentials = self.credentials(slot)?;
        self.dispatcher
            .get(service, path, Some(params), Some(&credentials))
            .await
    }

    /// Signed POST using the credentials in `slot`
    #[instrument(skip(self, params), fields(service = %service, path = %path))]
    pub async fn authenticated_post(
        &self,
        service: Service,
        path: &str,
        params: RequestParams,
        slot: &CredentialSlot,
    ) -> Result<Value, ExchangeError> {
        let credentials = self.credentials(slot)?;
        self.dispatcher
            .post(service, path, params, Some(&credentials))
            .await
    }

    /// Canonical symbol for an unordered pair of asset codes, looked up in
    /// the listing of `service`
    pub async fn resolve_symbol(
        &self,
        service: Service,
        from: &str,
        to: &str,
    ) -> Result<String, ExchangeError> {
        let pair = TradePair::new(from, to)
            .map_err(|e| ExchangeError::InvalidParameters(e.to_string()))?;
        self.resolver(service).resolve(&pair).await
    }
}
