use crate::core::config::{ClientConfig, DEFAULT_API_KEY, DEFAULT_SECRET_KEY};
use crate::core::errors::{CredentialHalf, ExchangeError};
use secrecy::{ExposeSecret, Secret};

/// API key / secret pair used to sign one request
#[derive(Debug, Clone)]
pub struct Credentials {
    api_key: Secret<String>,
    api_secret: Secret<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            api_secret: Secret::new(api_secret.into()),
        }
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get API secret (use carefully - exposes secret)
    pub fn api_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }
}

/// Which configuration keys a request's credentials are read from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CredentialSlot {
    /// `BINANCE_API_KEY` / `BINANCE_SECRET_KEY`
    #[default]
    Default,
    /// An alternate account addressed by the names of its two config keys
    Named {
        key_name: String,
        secret_name: String,
    },
}

impl CredentialSlot {
    pub fn named(key_name: impl Into<String>, secret_name: impl Into<String>) -> Self {
        Self::Named {
            key_name: key_name.into(),
            secret_name: secret_name.into(),
        }
    }

    fn key_names(&self) -> (&str, &str) {
        match self {
            Self::Default => (DEFAULT_API_KEY, DEFAULT_SECRET_KEY),
            Self::Named {
                key_name,
                secret_name,
            } => (key_name, secret_name),
        }
    }
}

/// Resolve the credentials a slot points at.
///
/// Fails with `ConfigMissing` naming the absent half; an empty value counts
/// as absent.
pub fn resolve(config: &ClientConfig, slot: &CredentialSlot) -> Result<Credentials, ExchangeError> {
    let (key_name, secret_name) = slot.key_names();

    let api_key = config
        .value(key_name)
        .ok_or_else(|| ExchangeError::ConfigMissing {
            half: CredentialHalf::ApiKey,
            key: key_name.to_string(),
        })?;
    let api_secret = config
        .value(secret_name)
        .ok_or_else(|| ExchangeError::ConfigMissing {
            half: CredentialHalf::ApiSecret,
            key: secret_name.to_string(),
        })?;

    Ok(Credentials::new(api_key, api_secret))
}
