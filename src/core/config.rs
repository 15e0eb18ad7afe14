use crate::core::types::Service;
use secrecy::{ExposeSecret, Secret};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::env;

/// Config key holding the default API key
pub const DEFAULT_API_KEY: &str = "BINANCE_API_KEY";
/// Config key holding the default API secret
pub const DEFAULT_SECRET_KEY: &str = "BINANCE_SECRET_KEY";

pub const DEFAULT_RECV_WINDOW_MS: u64 = 5000;
/// Upper bound the exchange accepts for `recvWindow`
pub const MAX_RECV_WINDOW_MS: u64 = 60_000;

/// Process-wide client configuration.
///
/// Credential values live in a name-keyed store so that alternate accounts
/// can be addressed by config key name (see `CredentialSlot::Named`).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    values: HashMap<String, Secret<String>>,
    pub recv_window: u64,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub testnet: bool,
    pub spot_base_url: Option<String>,
    pub futures_base_url: Option<String>,
}

// Never expose secrets in serialization
impl Serialize for ClientConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        let redacted: Vec<(&str, &str)> = keys.into_iter().map(|k| (k, "[REDACTED]")).collect();

        let mut state = serializer.serialize_struct("ClientConfig", 7)?;
        state.serialize_field("values", &redacted)?;
        state.serialize_field("recv_window", &self.recv_window)?;
        state.serialize_field("timeout_seconds", &self.timeout_seconds)?;
        state.serialize_field("user_agent", &self.user_agent)?;
        state.serialize_field("testnet", &self.testnet)?;
        state.serialize_field("spot_base_url", &self.spot_base_url)?;
        state.serialize_field("futures_base_url", &self.futures_base_url)?;
        state.end()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::read_only()
    }
}

impl ClientConfig {
    /// Create a configuration with the default credential pair set
    #[must_use]
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self::read_only()
            .with_value(DEFAULT_API_KEY, api_key)
            .with_value(DEFAULT_SECRET_KEY, secret_key)
    }

    /// Configuration without any credentials, for public endpoints only
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            values: HashMap::new(),
            recv_window: DEFAULT_RECV_WINDOW_MS,
            timeout_seconds: 30,
            user_agent: concat!("mbx-rest/", env!("CARGO_PKG_VERSION")).to_string(),
            testnet: false,
            spot_base_url: None,
            futures_base_url: None,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Recognized variables (all optional):
    /// - `BINANCE_API_KEY`, `BINANCE_SECRET_KEY`
    /// - `BINANCE_TESTNET` (defaults to false)
    /// - `BINANCE_RECV_WINDOW` (milliseconds)
    /// - `BINANCE_TIMEOUT_SECONDS`
    /// - `BINANCE_SPOT_BASE_URL`, `BINANCE_FUTURES_BASE_URL`
    ///
    /// Missing credentials are not an error here; they surface as
    /// `ConfigMissing` when a signed request is attempted.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::read_only().with_env_slot(DEFAULT_API_KEY, DEFAULT_SECRET_KEY);

        config.testnet = env::var("BINANCE_TESTNET")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        if let Some(recv_window) = parse_env_u64("BINANCE_RECV_WINDOW")? {
            config.recv_window = recv_window;
        }
        if let Some(timeout) = parse_env_u64("BINANCE_TIMEOUT_SECONDS")? {
            config.timeout_seconds = timeout;
        }

        config.spot_base_url = env::var("BINANCE_SPOT_BASE_URL").ok();
        config.futures_base_url = env::var("BINANCE_FUTURES_BASE_URL").ok();

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file() -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // no file, fall through to the process environment
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env()
    }

    /// Load an alternate credential slot from the environment.
    ///
    /// Variables that are not set are skipped.
    #[must_use]
    pub fn with_env_slot(mut self, key_name: &str, secret_name: &str) -> Self {
        for name in [key_name, secret_name] {
            if let Ok(value) = env::var(name) {
                self.values.insert(name.to_string(), Secret::new(value));
            }
        }
        self
    }

    /// Set a named configuration value
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), Secret::new(value.into()));
        self
    }

    /// Read a named configuration value (use carefully - exposes secret).
    ///
    /// Empty values read as absent.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(|v| v.expose_secret().as_str())
            .filter(|v| !v.is_empty())
    }

    /// Check if the default credential pair is present
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.value(DEFAULT_API_KEY).is_some() && self.value(DEFAULT_SECRET_KEY).is_some()
    }

    /// Set testnet mode
    #[must_use]
    pub const fn testnet(mut self, testnet: bool) -> Self {
        self.testnet = testnet;
        self
    }

    #[must_use]
    pub const fn with_recv_window(mut self, recv_window: u64) -> Self {
        self.recv_window = recv_window;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Override the base URL of one service
    #[must_use]
    pub fn with_base_url(mut self, service: Service, base_url: impl Into<String>) -> Self {
        let base_url = Some(base_url.into());
        match service {
            Service::Spot => self.spot_base_url = base_url,
            Service::Futures => self.futures_base_url = base_url,
        }
        self
    }

    /// Base URL a request for `service` is sent to
    pub fn base_url(&self, service: Service) -> &str {
        let custom = match service {
            Service::Spot => self.spot_base_url.as_deref(),
            Service::Futures => self.futures_base_url.as_deref(),
        };
        match custom {
            Some(url) => url.trim_end_matches('/'),
            None if self.testnet => service.testnet_base_url(),
            None => service.base_url(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recv_window == 0 || self.recv_window > MAX_RECV_WINDOW_MS {
            return Err(ConfigError::InvalidConfiguration(format!(
                "recvWindow must be within 1..={} ms, got {}",
                MAX_RECV_WINDOW_MS, self.recv_window
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| {
            ConfigError::InvalidConfiguration(format!("{} is not a number: {}", name, raw))
        }),
        Err(_) => Ok(None),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
