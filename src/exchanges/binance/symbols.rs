use crate::core::errors::ExchangeError;
use crate::core::kernel::{decode, HttpTransport, RequestParams, RestDispatcher};
use crate::core::types::{Service, TradePair};
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

/// Uppercase canonical symbols, e.g. `"ETHBTC"`
pub type SymbolSet = HashSet<String>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    #[error("Symbol cache not initialized")]
    NotInitialized,
}

/// Tradable-symbol snapshot, `Uninitialized` until the first store and
/// `Populated` from then on. There is no path back to `Uninitialized`.
#[derive(Debug, Default)]
pub struct SymbolCache {
    snapshot: RwLock<Option<Arc<SymbolSet>>>,
    /// Completed population attempts, successful or not
    attempts: AtomicU64,
    /// Held for the duration of a fetch; keeps the last failure for callers
    /// that queued behind it
    populate: tokio::sync::Mutex<Option<ExchangeError>>,
}

impl SymbolCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-blocking read of the current snapshot
    pub fn get(&self) -> Result<Arc<SymbolSet>, CacheError> {
        self.snapshot
            .read()
            .as_ref()
            .map(Arc::clone)
            .ok_or(CacheError::NotInitialized)
    }

    /// Install a snapshot, replacing any previous one
    pub fn store(&self, symbols: SymbolSet) -> Arc<SymbolSet> {
        let symbols = Arc::new(symbols);
        *self.snapshot.write() = Some(Arc::clone(&symbols));
        symbols
    }

    pub fn is_populated(&self) -> bool {
        self.snapshot.read().is_some()
    }

    /// Return the snapshot, running `fetch` to populate it on a miss.
    ///
    /// At most one `fetch` is in flight at a time. Callers that queued on the
    /// populate lock while it ran take its outcome: the stored snapshot on
    /// success, a copy of its error on failure. A failed fetch stores nothing,
    /// so the next caller to arrive afterwards fetches again.
    pub async fn get_or_populate<F, Fut>(
        &self,
        fetch: F,
    ) -> Result<Arc<SymbolSet>, ExchangeError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SymbolSet, ExchangeError>>,
    {
        if let Ok(symbols) = self.get() {
            return Ok(symbols);
        }

        let seen = self.attempts.load(Ordering::Acquire);
        let mut last_failure = self.populate.lock().await;
        if let Ok(symbols) = self.get() {
            debug!("Symbol cache populated by a concurrent caller");
            return Ok(symbols);
        }
        if self.attempts.load(Ordering::Acquire) != seen {
            if let Some(err) = last_failure.as_ref() {
                debug!(error = %err, "Concurrent symbol cache population failed");
                return Err(err.duplicate());
            }
        }

        let result = fetch().await;
        self.attempts.fetch_add(1, Ordering::Release);
        match result {
            Ok(symbols) => {
                *last_failure = None;
                info!(count = symbols.len(), "Symbol cache populated");
                Ok(self.store(symbols))
            }
            Err(err) => {
                warn!(error = %err, "Symbol cache population failed");
                *last_failure = Some(err.duplicate());
                Err(err)
            }
        }
    }
}

/// One symbol cache per service, since each lists its own symbols
#[derive(Debug, Clone, Default)]
pub struct SymbolCaches {
    pub spot: Arc<SymbolCache>,
    pub futures: Arc<SymbolCache>,
}

impl SymbolCaches {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn for_service(&self, service: Service) -> &Arc<SymbolCache> {
        match service {
            Service::Spot => &self.spot,
            Service::Futures => &self.futures,
        }
    }
}

/// Listing entry; only the symbol is read
#[derive(Deserialize)]
struct ListedSymbol {
    symbol: String,
}

/// Maps an unordered asset pair onto the exchange's canonical symbol
pub struct SymbolResolver<T> {
    dispatcher: Arc<RestDispatcher<T>>,
    cache: Arc<SymbolCache>,
    service: Service,
}

impl<T: HttpTransport> SymbolResolver<T> {
    pub fn new(
        dispatcher: Arc<RestDispatcher<T>>,
        cache: Arc<SymbolCache>,
        service: Service,
    ) -> Self {
        Self {
            dispatcher,
            cache,
            service,
        }
    }

    pub fn cache(&self) -> &Arc<SymbolCache> {
        &self.cache
    }

    /// Resolve `pair` to a listed symbol, populating the cache on first use.
    #[instrument(skip(self, pair), fields(service = %self.service, pair = %pair))]
    pub async fn resolve(&self, pair: &TradePair) -> Result<String, ExchangeError> {
        let symbols = match self.cache.get() {
            Ok(symbols) => symbols,
            Err(CacheError::NotInitialized) => {
                self.cache
                    .get_or_populate(|| self.fetch_symbols())
                    .await?
            }
        };

        match_symbol(&symbols, pair)
    }

    async fn fetch_symbols(&self) -> Result<SymbolSet, ExchangeError> {
        let path = self.service.ticker_price_path();
        debug!(path, "Fetching symbol listing");

        let value = self
            .dispatcher
            .public_get(self.service, path, &RequestParams::new())
            .await?;
        let listing: Vec<ListedSymbol> = decode(value)?;

        Ok(listing
            .into_iter()
            .map(|entry| entry.symbol.to_uppercase())
            .collect())
    }
}

/// Find the single listed concatenation of `pair`, in either order
pub fn match_symbol(symbols: &SymbolSet, pair: &TradePair) -> Result<String, ExchangeError> {
    let (forward, reverse) = pair.candidates();

    match (symbols.contains(&forward), symbols.contains(&reverse)) {
        (true, true) if forward != reverse => {
            error!(%pair, %forward, %reverse, "Both symbol orderings are listed");
            Err(ExchangeError::AmbiguousSymbol {
                pair: pair.clone(),
                forward,
                reverse,
            })
        }
        (true, _) => Ok(forward),
        (false, true) => Ok(reverse),
        (false, false) => Err(ExchangeError::SymbolNotFound(pair.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(list: &[&str]) -> SymbolSet {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn pair(from: &str, to: &str) -> TradePair {
        TradePair::new(from, to).unwrap()
    }

    #[test]
    fn test_cache_lifecycle() {
        let cache = SymbolCache::new();
        assert_eq!(cache.get().unwrap_err(), CacheError::NotInitialized);
        assert!(!cache.is_populated());

        cache.store(symbols(&["ETHBTC"]));
        assert!(cache.get().unwrap().contains("ETHBTC"));

        cache.store(symbols(&["LTCBTC"]));
        let snapshot = cache.get().unwrap();
        assert!(snapshot.contains("LTCBTC"));
        assert!(!snapshot.contains("ETHBTC"));
    }

    #[test]
    fn test_match_is_order_insensitive() {
        let set = symbols(&["ETHBTC", "BNBUSDT"]);
        assert_eq!(match_symbol(&set, &pair("eth", "btc")).unwrap(), "ETHBTC");
        assert_eq!(match_symbol(&set, &pair("BTC", "ETH")).unwrap(), "ETHBTC");
        assert_eq!(match_symbol(&set, &pair("usdt", "Bnb")).unwrap(), "BNBUSDT");
    }

    #[test]
    fn test_match_not_found_both_orders() {
        let set = symbols(&["ETHBTC"]);
        assert!(matches!(
            match_symbol(&set, &pair("DOGE", "EUR")),
            Err(ExchangeError::SymbolNotFound(_))
        ));
        assert!(matches!(
            match_symbol(&set, &pair("EUR", "DOGE")),
            Err(ExchangeError::SymbolNotFound(_))
        ));
    }

    #[test]
    fn test_match_both_orders_listed_is_ambiguous() {
        let set = symbols(&["AB", "BA"]);
        match match_symbol(&set, &pair("A", "B")) {
            Err(ExchangeError::AmbiguousSymbol { forward, reverse, .. }) => {
                assert_eq!(forward, "AB");
                assert_eq!(reverse, "BA");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_population_leaves_cache_empty() {
        let cache = SymbolCache::new();
        let result = cache
            .get_or_populate(|| async { Err(ExchangeError::Other("boom".to_string())) })
            .await;
        assert!(result.is_err());
        assert!(!cache.is_populated());

        let snapshot = cache
            .get_or_populate(|| async { Ok(symbols(&["ETHBTC"])) })
            .await
            .unwrap();
        assert!(snapshot.contains("ETHBTC"));
    }

    #[tokio::test]
    async fn test_queued_callers_share_failed_fetch() {
        let cache = SymbolCache::new();
        let counter = AtomicU64::new(0);
        let fetches = &counter;
        let fetch = move || async move {
            fetches.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            Err(ExchangeError::ApiError {
                code: -1001,
                message: "Internal error".to_string(),
            })
        };

        let (a, b, c) = tokio::join!(
            cache.get_or_populate(fetch),
            cache.get_or_populate(fetch),
            cache.get_or_populate(fetch)
        );
        for result in [a, b, c] {
            assert!(matches!(
                result,
                Err(ExchangeError::ApiError { code: -1001, .. })
            ));
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(!cache.is_populated());

        // a later caller retries
        assert!(cache.get_or_populate(fetch).await.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_caches_are_per_service() {
        let caches = SymbolCaches::new();
        caches.for_service(Service::Futures).store(symbols(&["1000SHIBUSDT"]));
        assert!(caches.futures.is_populated());
        assert!(!caches.for_service(Service::Spot).is_populated());
    }

    #[tokio::test]
    async fn test_populated_cache_skips_fetch() {
        let cache = SymbolCache::new();
        cache.store(symbols(&["ETHBTC"]));
        let snapshot = cache
            .get_or_populate(|| async { Err(ExchangeError::Other("fetch must not run".to_string())) })
            .await
            .unwrap();
        assert!(snapshot.contains("ETHBTC"));
    }
}
