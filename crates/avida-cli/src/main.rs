mod cli;
mod commands;

use clap::Parser;

use avida_client::ClientConfig;

use crate::cli::Cli;
use crate::commands::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "avida=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Config: flags win over the environment
    let api_url = cli.api_url.clone();
    let config = ClientConfig::from_lookup(|key| match key {
        "AVIDA_API_URL" if api_url.is_some() => api_url.clone(),
        _ => std::env::var(key).ok(),
    })?;
    tracing::debug!("Using backend {}", config.api_url);

    let app = App::new(config)?;
    commands::run(&app, cli.command).await
}
