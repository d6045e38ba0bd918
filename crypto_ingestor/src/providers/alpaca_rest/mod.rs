//! Alpaca REST API: crypto bars from the market-data API and asset listings
//! from the trading API.
//!
//! Credentials are supplied per call site and never read from the environment.
//! Each provider owns its own [`reqwest::Client`]; nothing is shared between
//! requests.

pub mod params;
pub mod provider;
pub mod response;
pub mod trading;

use std::time::Duration;

use reqwest::{
    Client, Response,
    header::{self, HeaderValue},
};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use snafu::ResultExt;

use crate::providers::{
    ApiSnafu, ClientBuildSnafu, InvalidApiKeySnafu, ProviderError, ProviderInitError, ReqwestSnafu,
};

pub use provider::AlpacaProvider;
pub use trading::AlpacaTradingClient;

pub const DEFAULT_DATA_URL: &str = "https://data.alpaca.markets";
pub const DEFAULT_TRADING_URL: &str = "https://paper-api.alpaca.markets";

const KEY_HEADER: &str = "APCA-API-KEY-ID";
const SECRET_HEADER: &str = "APCA-API-SECRET-KEY";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Key/secret pair for the Alpaca APIs.
///
/// Both halves are wrapped in [`SecretString`], so `Debug` output is redacted.
#[derive(Debug)]
pub struct AlpacaCredentials {
    api_key: SecretString,
    secret_key: SecretString,
}

impl AlpacaCredentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into().into_boxed_str()),
            secret_key: SecretString::new(secret_key.into().into_boxed_str()),
        }
    }
}

/// Builds a client that sends the credentials as default headers.
fn build_client(credentials: &AlpacaCredentials) -> Result<Client, ProviderInitError> {
    let mut key = HeaderValue::from_str(credentials.api_key.expose_secret())
        .context(InvalidApiKeySnafu)?;
    key.set_sensitive(true);
    let mut secret = HeaderValue::from_str(credentials.secret_key.expose_secret())
        .context(InvalidApiKeySnafu)?;
    secret.set_sensitive(true);

    let mut headers = header::HeaderMap::new();
    headers.insert(KEY_HEADER, key);
    headers.insert(SECRET_HEADER, secret);

    Client::builder()
        .default_headers(headers)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context(ClientBuildSnafu)
}

/// Joins a configured base URL and an API path without doubling slashes.
fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Decodes a JSON body, turning non-success statuses into [`ProviderError::Api`].
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown API error".to_string());
        return ApiSnafu {
            status: status.as_u16(),
            message,
        }
        .fail();
    }
    response.json::<T>().await.context(ReqwestSnafu)
}
