#![allow(dead_code)]

use async_trait::async_trait;
use mbx_rest::core::kernel::{sign_query, HttpRequest, HttpResponse, HttpTransport, API_KEY_HEADER};
use mbx_rest::{BinanceClient, ClientConfig, ExchangeError, SymbolCaches};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Test configuration utilities
pub struct TestConfig;

impl TestConfig {
    /// Check if live API tests should run (hits the public exchange endpoints)
    pub fn should_run_live_tests() -> bool {
        env::var("RUN_LIVE_TESTS").unwrap_or_default() == "true"
    }

    pub fn test_timeout() -> Duration {
        Duration::from_secs(
            env::var("TEST_TIMEOUT_SECONDS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(30),
        )
    }
}

/// In-memory transport answering by URL path, recording every request
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, (u16, String)>>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Answer requests to `route` (a path, or a path with its exact query)
    pub fn route(self, route: &str, status: u16, body: &str) -> Self {
        self.set_route(route, status, body);
        self
    }

    pub fn set_route(&self, route: &str, status: u16, body: &str) {
        self.routes
            .lock()
            .insert(route.to_string(), (status, body.to_string()));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| path_of(&r.url) == path)
            .count()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().last().cloned()
    }
}

/// Shared handle so tests keep access to the transport after handing it over
#[derive(Clone, Default)]
pub struct SharedTransport(pub Arc<MockTransport>);

#[async_trait]
impl HttpTransport for SharedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ExchangeError> {
        let mock = &self.0;
        mock.calls.fetch_add(1, Ordering::SeqCst);
        let path = path_of(&request.url).to_string();
        let with_query = format!("{}?{}", path, query_of(&request.url));
        mock.requests.lock().push(request);

        if let Some(delay) = mock.delay {
            tokio::time::sleep(delay).await;
        }

        let (status, body) = {
            let routes = mock.routes.lock();
            routes
                .get(&with_query)
                .or_else(|| routes.get(&path))
                .cloned()
                .unwrap_or((404, r#"{"code":-1,"msg":"no mock route"}"#.to_string()))
        };
        Ok(HttpResponse { status, body })
    }
}

/// Path component of an absolute URL, without the query
pub fn path_of(url: &str) -> &str {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path_and_query = without_scheme
        .find('/')
        .map_or("", |i| &without_scheme[i..]);
    path_and_query
        .split_once('?')
        .map_or(path_and_query, |(path, _)| path)
}

/// Query component of an absolute URL
pub fn query_of(url: &str) -> &str {
    url.split_once('?').map_or("", |(_, query)| query)
}

pub const TICKER_LISTING: &str = r#"[
    {"symbol": "ETHBTC", "price": "0.05250000"},
    {"symbol": "LTCBTC", "price": "0.00123400"},
    {"symbol": "BNBUSDT", "price": "301.20000000"},
    {"symbol": "BTCUSDT", "price": "65000.01000000"}
]"#;

pub fn test_config() -> ClientConfig {
    ClientConfig::new("test-api-key", "test-secret")
}

pub fn client_with(
    mock: MockTransport,
    config: ClientConfig,
) -> (BinanceClient<SharedTransport>, Arc<MockTransport>) {
    let shared = SharedTransport(Arc::new(mock));
    let handle = Arc::clone(&shared.0);
    let client = BinanceClient::with_transport(shared, config, &SymbolCaches::new())
        .expect("valid test config");
    (client, handle)
}

/// Header value sent under `name`, if any
pub fn header<'a>(request: &'a HttpRequest, name: &str) -> Option<&'a str> {
    request
        .headers
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| v.as_str())
}

/// Assert the request carries `api_key` and a valid signature over everything
/// in the query that precedes it.
pub fn assert_signed(request: &HttpRequest, api_key: &str, secret: &str) {
    assert_eq!(header(request, API_KEY_HEADER), Some(api_key));

    let query = query_of(&request.url);
    let (signed, signature) = query
        .rsplit_once("&signature=")
        .expect("signature must be the last query parameter");
    assert_eq!(sign_query(secret, signed).unwrap(), signature);
}
