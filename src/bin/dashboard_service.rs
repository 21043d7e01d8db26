use anyhow::Result;
use crypto_price_app::{config::Config, services::ApiService};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    info!("🔧 启动加密货币行情看板...");

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded successfully");

    let api_service = ApiService::new(config)?;
    api_service.start().await?;

    Ok(())
}
