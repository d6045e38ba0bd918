use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::Client;
use snafu::ResultExt;
use tracing::debug;

use crate::{
    models::{bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{
        DataProvider, ProviderError, ProviderInitError, ReqwestSnafu,
        alpaca_rest::{
            AlpacaCredentials, DEFAULT_DATA_URL, build_client, endpoint,
            params::{construct_params, validate_request},
            read_json,
            response::{AlpacaBar, AlpacaResponse},
        },
    },
};

const BARS_PATH: &str = "/v1beta3/crypto/us/bars";

/// Historical crypto bars from the Alpaca market-data API.
pub struct AlpacaProvider {
    client: Client,
    base_url: String,
}

impl AlpacaProvider {
    /// Creates a provider against the public Alpaca data host.
    pub fn new(credentials: &AlpacaCredentials) -> Result<Self, ProviderInitError> {
        Self::with_base_url(credentials, DEFAULT_DATA_URL)
    }

    /// Creates a provider against another host, e.g. a proxy or a test server.
    pub fn with_base_url(
        credentials: &AlpacaCredentials,
        base_url: impl Into<String>,
    ) -> Result<Self, ProviderInitError> {
        Ok(Self {
            client: build_client(credentials)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl DataProvider for AlpacaProvider {
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
        validate_request(&params)?;

        let url = endpoint(&self.base_url, BARS_PATH);
        let mut all_bars: IndexMap<String, Vec<AlpacaBar>> = IndexMap::new();
        let mut next_page_token: Option<String> = None;

        loop {
            let mut query_params = construct_params(&params);
            if let Some(token) = &next_page_token {
                query_params.push(("page_token".to_string(), token.clone()));
            }

            let response = self
                .client
                .get(&url)
                .query(&query_params)
                .send()
                .await
                .context(ReqwestSnafu)?;
            let page: AlpacaResponse = read_json(response).await?;

            // Merge the bars from the current page into our collection.
            for (symbol, bars) in page.bars {
                all_bars.entry(symbol).or_default().extend(bars);
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => {
                    debug!(page_token = %token, "following bars continuation");
                    next_page_token = Some(token);
                }
                _ => break,
            }
        }

        let result = all_bars
            .into_iter()
            .map(|(symbol, alpaca_bars)| BarSeries {
                symbol,
                timeframe: params.timeframe.clone(),
                bars: alpaca_bars.into_iter().map(Into::into).collect(),
            })
            .collect();

        Ok(result)
    }
}
