use super::types::SubAccountTransferResponse;
use super::BinanceClient;
use crate::core::credentials::CredentialSlot;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{decode, HttpTransport, RequestParams};
use crate::core::types::Service;
use rust_decimal::Decimal;
use tracing::instrument;

const UNIVERSAL_TRANSFER_PATH: &str = "/sapi/v1/sub-account/universalTransfer";

/// Wallet a universal transfer moves funds between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    Spot,
    UsdtFuture,
    CoinFuture,
    Margin,
    IsolatedMargin,
}

impl AccountType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spot => "SPOT",
            Self::UsdtFuture => "USDT_FUTURE",
            Self::CoinFuture => "COIN_FUTURE",
            Self::Margin => "MARGIN",
            Self::IsolatedMargin => "ISOLATED_MARGIN",
        }
    }
}

/// Master/sub-account transfer. Omitting an email addresses the master
/// account on that side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubAccountTransfer {
    pub from_email: Option<String>,
    pub to_email: Option<String>,
    pub from_account_type: AccountType,
    pub to_account_type: AccountType,
    pub asset: String,
    pub amount: Decimal,
    pub client_tran_id: Option<String>,
    /// Required only for isolated-margin transfers
    pub symbol: Option<String>,
}

impl SubAccountTransfer {
    pub fn new(
        asset: impl Into<String>,
        amount: Decimal,
        from_account_type: AccountType,
        to_account_type: AccountType,
    ) -> Self {
        Self {
            from_email: None,
            to_email: None,
            from_account_type,
            to_account_type,
            asset: asset.into(),
            amount,
            client_tran_id: None,
            symbol: None,
        }
    }

    pub fn from_email(mut self, email: impl Into<String>) -> Self {
        self.from_email = Some(email.into());
        self
    }

    pub fn to_email(mut self, email: impl Into<String>) -> Self {
        self.to_email = Some(email.into());
        self
    }

    pub fn with_client_tran_id(mut self, id: impl Into<String>) -> Self {
        self.client_tran_id = Some(id.into());
        self
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn to_request_params(&self) -> Result<RequestParams, ExchangeError> {
        if self.amount <= Decimal::ZERO {
            return Err(ExchangeError::InvalidParameters(format!(
                "transfer amount must be positive, got {}",
                self.amount
            )));
        }
        let isolated = self.from_account_type == AccountType::IsolatedMargin
            || self.to_account_type == AccountType::IsolatedMargin;
        if isolated && self.symbol.is_none() {
            return Err(ExchangeError::InvalidParameters(
                "isolated margin transfers require a symbol".to_string(),
            ));
        }

        Ok(RequestParams::new()
            .with_opt("fromEmail", self.from_email.as_deref())
            .with_opt("toEmail", self.to_email.as_deref())
            .with("fromAccountType", self.from_account_type.as_str())
            .with("toAccountType", self.to_account_type.as_str())
            .with_opt("clientTranId", self.client_tran_id.as_deref())
            .with_opt("symbol", self.symbol.as_deref())
            .with("asset", self.asset.to_ascii_uppercase())
            .with("amount", self.amount.normalize()))
    }
}

impl<T: HttpTransport> BinanceClient<T> {
    /// Universal transfer, signed with the master account's credentials in `slot`
    #[instrument(skip(self, transfer), fields(asset = %transfer.asset, amount = %transfer.amount))]
    pub async fn sub_account_transfer(
        &self,
        transfer: &SubAccountTransfer,
        slot: &CredentialSlot,
    ) -> Result<SubAccountTransferResponse, ExchangeError> {
        let params = transfer.to_request_params()?;
        let value = self
            .authenticated_post(Service::Spot, UNIVERSAL_TRANSFER_PATH, params, slot)
            .await?;
        decode(value)
    }
}
