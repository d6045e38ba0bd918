//! Vendor-neutral description of a bars request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    models::{asset::AssetClass, timeframe::TimeFrame},
    providers::alpaca_rest::params::AlpacaBarsParams,
};

/// Input of every [`DataProvider`](crate::providers::DataProvider).
///
/// Whether `timeframe` is acceptable is for the provider to decide.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BarsRequestParams {
    /// Pairs such as `"BTC/USD"`.
    pub symbols: Vec<String>,
    pub timeframe: TimeFrame,
    /// Both ends inclusive, UTC.
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub asset_class: AssetClass,
    #[serde(default)]
    pub provider_specific: ProviderParams,
}

impl BarsRequestParams {
    /// Crypto request with provider defaults.
    pub fn crypto(
        symbols: Vec<String>,
        timeframe: TimeFrame,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            symbols,
            timeframe,
            start,
            end,
            asset_class: AssetClass::Crypto,
            provider_specific: ProviderParams::None,
        }
    }

    pub fn with_provider_params(mut self, params: ProviderParams) -> Self {
        self.provider_specific = params;
        self
    }
}

/// Per-provider knobs that have no vendor-neutral meaning.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub enum ProviderParams {
    #[default]
    None,
    Alpaca(AlpacaBarsParams),
}
