use crate::core::config::ClientConfig;
use crate::core::credentials::{self, CredentialSlot, Credentials};
use crate::core::errors::ExchangeError;
use crate::core::kernel::params::RequestParams;
use crate::core::kernel::signer::HmacSigner;
use crate::core::types::Service;
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, instrument, trace, warn};

/// Header carrying the API key on signed requests
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// A fully assembled outbound request. POST bodies are always empty; every
/// parameter travels in the URL query.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
}

/// Raw response as read off the wire
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Transport seam: performs exactly one HTTP exchange per call.
///
/// Implementations must not retry.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ExchangeError>;
}

/// `HttpTransport` backed by a pooled reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ExchangeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ExchangeError> {
        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}

/// Issues public and signed requests and normalizes every response into
/// either a JSON payload or one typed error.
pub struct RestDispatcher<T = ReqwestTransport> {
    transport: T,
    config: Arc<ClientConfig>,
}

impl<T> std::fmt::Debug for RestDispatcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestDispatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RestDispatcher<ReqwestTransport> {
    /// Dispatcher over a reqwest client built from `config`
    pub fn from_config(config: Arc<ClientConfig>) -> Result<Self, ExchangeError> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::new(transport, config))
    }
}

impl<T: HttpTransport> RestDispatcher<T> {
    pub fn new(transport: T, config: Arc<ClientConfig>) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `path`. Without `params` the request is sent unsigned; with
    /// `params` it is signed using `credentials`, or the default slot when
    /// none are given.
    pub async fn get(
        &self,
        service: Service,
        path: &str,
        params: Option<RequestParams>,
        credentials: Option<&Credentials>,
    ) -> Result<Value, ExchangeError> {
        match params {
            None => self.public_get(service, path, &RequestParams::new()).await,
            Some(params) => {
                self.signed_request(Method::GET, service, path, params, credentials)
                    .await
            }
        }
    }

    /// Signed POST with every parameter in the query string
    pub async fn post(
        &self,
        service: Service,
        path: &str,
        params: RequestParams,
        credentials: Option<&Credentials>,
    ) -> Result<Value, ExchangeError> {
        self.signed_request(Method::POST, service, path, params, credentials)
            .await
    }

    /// Unsigned GET with optional query parameters
    #[instrument(skip(self, params), fields(service = %service, path = %path))]
    pub async fn public_get(
        &self,
        service: Service,
        path: &str,
        params: &RequestParams,
    ) -> Result<Value, ExchangeError> {
        let query = params.to_query_string()?;
        let base = self.config.base_url(service);
        let url = if query.is_empty() {
            format!("{}{}", base, path)
        } else {
            format!("{}{}?{}", base, path, query)
        };

        self.dispatch(HttpRequest {
            method: Method::GET,
            url,
            headers: Vec::new(),
        })
        .await
    }

    #[instrument(
        skip(self, params, credentials),
        fields(service = %service, method = %method, path = %path, param_count = params.len())
    )]
    async fn signed_request(
        &self,
        method: Method,
        service: Service,
        path: &str,
        mut params: RequestParams,
        credentials: Option<&Credentials>,
    ) -> Result<Value, ExchangeError> {
        let resolved;
        let credentials = match credentials {
            Some(credentials) => credentials,
            None => {
                resolved = credentials::resolve(&self.config, &CredentialSlot::Default)?;
                &resolved
            }
        };

        if !params.contains_key("recvWindow") {
            params.set("recvWindow", self.config.recv_window);
        }
        params.set("timestamp", timestamp_millis()?);

        let signer = HmacSigner::new(credentials);
        let signed = signer.sign(&params)?;
        let url = format!(
            "{}{}?{}",
            self.config.base_url(service),
            path,
            signed.to_url_query()
        );

        self.dispatch(HttpRequest {
            method,
            url,
            headers: vec![(API_KEY_HEADER, signer.api_key().to_string())],
        })
        .await
    }

    async fn dispatch(&self, request: HttpRequest) -> Result<Value, ExchangeError> {
        let response = self.transport.execute(request).await?;
        handle_response(response)
    }
}

/// Classify a raw response.
///
/// An embedded `{"code", "msg"}` object is an error regardless of HTTP status.
pub fn handle_response(response: HttpResponse) -> Result<Value, ExchangeError> {
    trace!(status = response.status, "Response body: {}", response.body);

    let value: Value = serde_json::from_str(&response.body)?;

    if let Some(err) = api_error(&value) {
        warn!(status = response.status, error = %err, "Exchange rejected request");
        return Err(err);
    }

    if !(200..300).contains(&response.status) {
        debug!(status = response.status, "Non-success status without error payload");
        return Err(ExchangeError::ApiError {
            code: i64::from(response.status),
            message: response.body,
        });
    }

    Ok(value)
}

fn api_error(value: &Value) -> Option<ExchangeError> {
    let object = value.as_object()?;
    let code = object.get("code")?.as_i64()?;
    let message = object.get("msg")?.as_str()?;
    Some(ExchangeError::ApiError {
        code,
        message: message.to_string(),
    })
}

/// Convert a success payload into a typed response
pub fn decode<R: DeserializeOwned>(value: Value) -> Result<R, ExchangeError> {
    Ok(serde_json::from_value(value)?)
}

pub fn timestamp_millis() -> Result<u64, ExchangeError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .map_err(|e| ExchangeError::Other(format!("System time error: {}", e)))
}
