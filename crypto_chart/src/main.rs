use anyhow::{Context, Result};
use clap::Parser;
use crypto_chart::{
    cli::{Cli, Commands},
    config::AppConfig,
    pipeline::{FetchForm, list_crypto_symbols, render_chart, run_fetch_pipeline},
    routes::{AppState, router},
};
use crypto_ingestor::providers::alpaca_rest::AlpacaCredentials;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Commands::Serve { bind } => serve(config, bind).await,
        Commands::Fetch {
            api_key,
            api_secret,
            start,
            end,
            asset,
        } => {
            let form = FetchForm {
                api_key: Some(api_key),
                api_secret: Some(api_secret),
                start_date: Some(start),
                end_date: Some(end),
                asset,
            };
            let outcome = run_fetch_pipeline(&config, form).await?;
            println!("{}", outcome.csv_path.display());
            Ok(())
        }
        Commands::Plot { asset } => {
            let asset = asset.unwrap_or_else(|| config.alpaca.default_asset.clone());
            let image = render_chart(&config, &asset)?;
            println!("{}", image.display());
            Ok(())
        }
        Commands::Assets {
            api_key,
            api_secret,
        } => {
            let credentials = AlpacaCredentials::new(api_key, api_secret);
            for symbol in list_crypto_symbols(&config, &credentials).await? {
                println!("{symbol}");
            }
            Ok(())
        }
    }
}

async fn serve(config: AppConfig, bind: Option<String>) -> Result<()> {
    let addr = bind.unwrap_or_else(|| config.server.bind.clone());
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "serving crypto charts");

    axum::serve(listener, router(AppState::new(config)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
