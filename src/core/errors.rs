use crate::core::config::ConfigError;
use crate::core::types::TradePair;
use std::fmt;
use thiserror::Error;

/// Which half of a credential pair could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialHalf {
    ApiKey,
    ApiSecret,
}

impl fmt::Display for CredentialHalf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey => f.write_str("API key"),
            Self::ApiSecret => f.write_str("API secret"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Missing {half} (config key `{key}`)")]
    ConfigMissing { half: CredentialHalf, key: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON decoding error: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("API error: {code} - {message}")]
    ApiError { code: i64, message: String },

    #[error("Insufficient balance: {code} - {message}")]
    InsufficientBalance { code: i64, message: String },

    #[error("No symbol listed for pair {0}")]
    SymbolNotFound(TradePair),

    #[error("Ambiguous symbol for pair {pair}: both {forward} and {reverse} are listed")]
    AmbiguousSymbol {
        pair: TradePair,
        forward: String,
        reverse: String,
    },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Other error: {0}")]
    Other(String),
}

/// Spot `-2010` shares its code with every other new-order rejection, so the
/// message has to match as well.
const INSUFFICIENT_BALANCE: &[(i64, &str)] = &[
    (-2010, "Account has insufficient balance for requested action."),
    (-2019, "Margin is insufficient."),
];

impl ExchangeError {
    /// Re-classify an order placement rejection into `InsufficientBalance`
    /// when it carries one of the known code/message pairs.
    pub fn classify_order_rejection(self) -> Self {
        match self {
            Self::ApiError { code, message }
                if INSUFFICIENT_BALANCE
                    .iter()
                    .any(|(c, m)| *c == code && *m == message) =>
            {
                Self::InsufficientBalance { code, message }
            }
            other => other,
        }
    }

    /// Copy of this error for handing to more than one caller.
    ///
    /// Variants wrapping a non-cloneable source error keep only its message.
    pub fn duplicate(&self) -> Self {
        match self {
            Self::ConfigMissing { half, key } => Self::ConfigMissing {
                half: *half,
                key: key.clone(),
            },
            Self::ApiError { code, message } => Self::ApiError {
                code: *code,
                message: message.clone(),
            },
            Self::InsufficientBalance { code, message } => Self::InsufficientBalance {
                code: *code,
                message: message.clone(),
            },
            Self::SymbolNotFound(pair) => Self::SymbolNotFound(pair.clone()),
            Self::AmbiguousSymbol {
                pair,
                forward,
                reverse,
            } => Self::AmbiguousSymbol {
                pair: pair.clone(),
                forward: forward.clone(),
                reverse: reverse.clone(),
            },
            Self::InvalidParameters(msg) => Self::InvalidParameters(msg.clone()),
            Self::AuthError(msg) => Self::AuthError(msg.clone()),
            Self::Other(msg) => Self::Other(msg.clone()),
            Self::HttpError(_) | Self::DecodeError(_) | Self::ConfigError(_) => {
                Self::Other(self.to_string())
            }
        }
    }

    /// Exchange-side error code, if this error came from an error payload.
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Self::ApiError { code, .. } | Self::InsufficientBalance { code, .. } => Some(*code),
            _ => None,
        }
    }
}
