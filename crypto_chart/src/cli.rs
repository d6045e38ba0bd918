use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a TOML config file (falls back to $CRYPTO_CHART_CONFIG, then defaults)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Address to listen on, overriding `server.bind`
        #[arg(long)]
        bind: Option<String>,
    },

    /// Fetch daily bars and replace the stored CSV
    Fetch {
        #[arg(long)]
        api_key: String,

        #[arg(long)]
        api_secret: String,

        /// First day, YYYY-MM-DD
        #[arg(long)]
        start: String,

        /// Last day (inclusive), YYYY-MM-DD
        #[arg(long)]
        end: String,

        /// Crypto pair such as "ETH/USD"; defaults to `alpaca.default_asset`
        #[arg(long)]
        asset: Option<String>,
    },

    /// Render the stored CSV into the chart image
    Plot {
        #[arg(long)]
        asset: Option<String>,
    },

    /// List the crypto symbols available to an account
    Assets {
        #[arg(long)]
        api_key: String,

        #[arg(long)]
        api_secret: String,
    },
}
