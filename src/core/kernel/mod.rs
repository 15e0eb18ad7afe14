//! Transport kernel for the authenticated request subsystem.
//!
//! - [`params`]: insertion-ordered request parameters
//! - [`signer`]: HMAC-SHA256 request signing
//! - [`rest`]: HTTP dispatch and response classification
//!
//! The string that is signed and the string sent on the wire come from the
//! same [`RequestParams::to_query_string`] call, so they are byte-identical.
//!
//! ```rust,no_run
//! use mbx_rest::core::config::ClientConfig;
//! use mbx_rest::core::kernel::{RequestParams, RestDispatcher};
//! use mbx_rest::core::types::Service;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), mbx_rest::ExchangeError> {
//! let config = Arc::new(ClientConfig::new("api_key", "secret_key"));
//! let rest = RestDispatcher::from_config(config)?;
//!
//! let account = rest
//!     .get(Service::Spot, "/api/v3/account", Some(RequestParams::new()), None)
//!     .await?;
//! println!("{}", account);
//! # Ok(())
//! # }
//! ```
pub mod params;
pub mod rest;
pub mod signer;

pub use params::RequestParams;
pub use rest::{
    decode, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, RestDispatcher,
    API_KEY_HEADER,
};
pub use signer::{sign, sign_query, HmacSigner, SignedRequest};
