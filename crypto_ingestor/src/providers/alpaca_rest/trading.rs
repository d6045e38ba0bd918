use reqwest::Client;
use snafu::ResultExt;

use crate::{
    models::asset::{Asset, crypto_symbols},
    providers::{
        ProviderError, ProviderInitError, ReqwestSnafu,
        alpaca_rest::{AlpacaCredentials, DEFAULT_TRADING_URL, build_client, endpoint, read_json},
    },
};

const ASSETS_PATH: &str = "/v2/assets";

/// Read-only access to the Alpaca trading (account) API.
pub struct AlpacaTradingClient {
    client: Client,
    base_url: String,
}

impl AlpacaTradingClient {
    /// Creates a client against the paper-trading host.
    pub fn new(credentials: &AlpacaCredentials) -> Result<Self, ProviderInitError> {
        Self::with_base_url(credentials, DEFAULT_TRADING_URL)
    }

    pub fn with_base_url(
        credentials: &AlpacaCredentials,
        base_url: impl Into<String>,
    ) -> Result<Self, ProviderInitError> {
        Ok(Self {
            client: build_client(credentials)?,
            base_url: base_url.into(),
        })
    }

    /// Every asset the account can see, in API order.
    pub async fn list_assets(&self) -> Result<Vec<Asset>, ProviderError> {
        let response = self
            .client
            .get(endpoint(&self.base_url, ASSETS_PATH))
            .send()
            .await
            .context(ReqwestSnafu)?;
        read_json(response).await
    }

    /// Symbols of the crypto-class assets only.
    pub async fn crypto_symbols(&self) -> Result<Vec<String>, ProviderError> {
        let assets = self.list_assets().await?;
        Ok(crypto_symbols(&assets))
    }
}
