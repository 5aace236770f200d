//! JUNGFRAU status dashboard - Entry Point

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

/// JUNGFRAU detector status dashboard
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via JFMON_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Determine config path: CLI arg > JFMON_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("JFMON_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    let config = jfmon_app::AppConfig::load(&config_path)?;

    jfmon_telemetry::init_logging(&config.telemetry.log_level)?;

    info!("Starting jfmon v{}", env!("CARGO_PKG_VERSION"));
    if jfmon_app::AppConfig::file_exists(&config_path) {
        info!(config_path = %config_path, "Configuration loaded");
    } else {
        warn!(config_path = %config_path, "Config file not found, using defaults");
    }

    let app = jfmon_app::Application::new(config)?;
    app.run().await?;

    Ok(())
}
