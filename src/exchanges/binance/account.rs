use super::types::BinanceAccountInfo;
use super::BinanceClient;
use crate::core::credentials::CredentialSlot;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{decode, HttpTransport, RequestParams};
use crate::core::types::Service;
use tracing::instrument;

impl<T: HttpTransport> BinanceClient<T> {
    /// Spot account information for the account in `slot`
    #[instrument(skip(self))]
    pub async fn account_info(
        &self,
        slot: &CredentialSlot,
    ) -> Result<BinanceAccountInfo, ExchangeError> {
        let value = self
            .authenticated_get(Service::Spot, "/api/v3/account", RequestParams::new(), slot)
            .await?;
        decode(value)
    }
}
