use crate::core::credentials::Credentials;
use crate::core::errors::ExchangeError;
use crate::core::kernel::params::RequestParams;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// A query string together with its signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub query_string: String,
    pub signature: String,
}

impl SignedRequest {
    /// Query sent on the wire: the signed string followed by `signature`
    pub fn to_url_query(&self) -> String {
        if self.query_string.is_empty() {
            format!("signature={}", self.signature)
        } else {
            format!("{}&signature={}", self.query_string, self.signature)
        }
    }
}

/// HMAC-SHA256 of `query_string` keyed by `secret`, uppercase hex
pub fn sign_query(secret: &str, query_string: &str) -> Result<String, ExchangeError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;
    mac.update(query_string.as_bytes());
    Ok(hex::encode_upper(mac.finalize().into_bytes()))
}

/// Serialize `params` in insertion order and sign the result
pub fn sign(secret: &str, params: &RequestParams) -> Result<SignedRequest, ExchangeError> {
    let query_string = params.to_query_string()?;
    let signature = sign_query(secret, &query_string)?;
    Ok(SignedRequest {
        query_string,
        signature,
    })
}

/// Signs requests for one resolved credential pair
pub struct HmacSigner<'a> {
    credentials: &'a Credentials,
}

impl<'a> HmacSigner<'a> {
    pub const fn new(credentials: &'a Credentials) -> Self {
        Self { credentials }
    }

    pub fn sign(&self, params: &RequestParams) -> Result<SignedRequest, ExchangeError> {
        sign(self.credentials.api_secret(), params)
    }

    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }
}
