use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::{
    models::{
        asset::AssetClass,
        request_params::{BarsRequestParams, ProviderParams},
        timeframe::{MONTH_AMOUNTS, TimeFrame, TimeFrameUnit},
    },
    providers::{ProviderError, ValidationSnafu},
};

/// Specifies the sort order for the bars.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sort {
    #[default]
    Asc,
    Desc,
}

impl Sort {
    fn as_str(&self) -> &'static str {
        match self {
            Sort::Asc => "asc",
            Sort::Desc => "desc",
        }
    }
}

/// Alpaca-specific parameters for a crypto bars request.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct AlpacaBarsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
}

/// Checks the timeframe against what the crypto bars endpoint accepts.
///
/// Applies the same amount rules as [`TimeFrame::new`] to values that may
/// have been built as struct literals.
pub fn validate_timeframe(timeframe: &TimeFrame) -> Result<(), ProviderError> {
    let valid = match timeframe.unit {
        TimeFrameUnit::Minute => (1..=59).contains(&timeframe.amount),
        TimeFrameUnit::Hour => (1..=23).contains(&timeframe.amount),
        TimeFrameUnit::Day | TimeFrameUnit::Week => timeframe.amount == 1,
        TimeFrameUnit::Month => MONTH_AMOUNTS.contains(&timeframe.amount),
    };
    if valid {
        Ok(())
    } else {
        ValidationSnafu {
            message: format!("unsupported timeframe {timeframe}"),
        }
        .fail()
    }
}

/// Rejects requests this provider cannot serve.
pub fn validate_request(params: &BarsRequestParams) -> Result<(), ProviderError> {
    if params.asset_class != AssetClass::Crypto {
        return ValidationSnafu {
            message: format!(
                "asset class {} is not served by the crypto bars endpoint",
                params.asset_class.as_str()
            ),
        }
        .fail();
    }
    if params.symbols.iter().all(|s| s.trim().is_empty()) {
        return ValidationSnafu {
            message: "at least one symbol is required",
        }
        .fail();
    }
    validate_timeframe(&params.timeframe)
}

/// Builds the query string for one page of `GET /v1beta3/crypto/us/bars`.
pub fn construct_params(params: &BarsRequestParams) -> Vec<(String, String)> {
    let symbols = params
        .symbols
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",");

    let mut query = vec![
        ("symbols".to_string(), symbols),
        ("timeframe".to_string(), params.timeframe.to_string()),
        (
            "start".to_string(),
            params.start.to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
        (
            "end".to_string(),
            params.end.to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
    ];

    if let ProviderParams::Alpaca(alpaca) = &params.provider_specific {
        if let Some(limit) = alpaca.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(sort) = &alpaca.sort {
            query.push(("sort".to_string(), sort.as_str().to_string()));
        }
    }

    query
}
