//! Application configuration loaded from TOML.
//!
//! Every field has a default, so an absent file or an empty table is valid.
//! Credentials are deliberately not part of the configuration.

use std::path::{Path, PathBuf};

use crypto_ingestor::providers::alpaca_rest::{DEFAULT_DATA_URL, DEFAULT_TRADING_URL};
use serde::Deserialize;
use shared_utils::{
    config::{ConfigError, load_toml},
    env::get_optional_env_var,
};
use tracing::debug;

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "CRYPTO_CHART_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub alpaca: AlpacaConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

/// Where the bar CSV and the rendered chart live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub csv_file: String,
    pub static_dir: PathBuf,
    pub plot_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            csv_file: "crypto_data.csv".to_string(),
            static_dir: PathBuf::from("static"),
            plot_file: "plot.svg".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlpacaConfig {
    pub data_url: String,
    pub trading_url: String,
    /// Symbol used when a submission leaves the asset blank.
    pub default_asset: String,
}

impl Default for AlpacaConfig {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            trading_url: DEFAULT_TRADING_URL.to_string(),
            default_asset: "BTC/USD".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads `explicit` if given, else the file named by [`CONFIG_ENV_VAR`],
    /// else the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| get_optional_env_var(CONFIG_ENV_VAR).map(PathBuf::from));

        match path {
            Some(path) => {
                debug!(path = %path.display(), "loading configuration");
                load_toml(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn csv_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.csv_file)
    }

    pub fn plot_path(&self) -> PathBuf {
        self.storage.static_dir.join(&self.storage.plot_file)
    }

    /// URL under which the rendered chart is served.
    pub fn plot_url(&self) -> String {
        format!("/static/{}", self.storage.plot_file)
    }
}
