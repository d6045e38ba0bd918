//! Tradable assets as reported by the Alpaca trading API.

use serde::{Deserialize, Serialize};

/// Coarse asset categorization used to route requests and filter listings.
///
/// Serialized with Alpaca's wire names (`us_equity`, `us_option`, `crypto`).
/// Anything else the API sends is kept verbatim in [`AssetClass::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssetClass {
    UsEquity,
    UsOption,
    Crypto,
    Other(String),
}

impl AssetClass {
    pub fn as_str(&self) -> &str {
        match self {
            AssetClass::UsEquity => "us_equity",
            AssetClass::UsOption => "us_option",
            AssetClass::Crypto => "crypto",
            AssetClass::Other(raw) => raw,
        }
    }
}

impl From<String> for AssetClass {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "us_equity" => AssetClass::UsEquity,
            "us_option" => AssetClass::UsOption,
            "crypto" => AssetClass::Crypto,
            _ => AssetClass::Other(raw),
        }
    }
}

impl From<AssetClass> for String {
    fn from(class: AssetClass) -> Self {
        class.as_str().to_string()
    }
}

/// One entry of `GET /v2/assets`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Asset {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "class")]
    pub asset_class: AssetClass,
    #[serde(default)]
    pub exchange: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tradable: bool,
}

/// Symbols of the crypto assets in `assets`, in their original order.
pub fn crypto_symbols(assets: &[Asset]) -> Vec<String> {
    assets
        .iter()
        .filter(|asset| asset.asset_class == AssetClass::Crypto)
        .map(|asset| asset.symbol.clone())
        .collect()
}
