use anyhow::Result;
use image_edit_relay::{config, server};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Validates that a log level string is valid
fn validate_log_level(level: &str) -> Result<LevelFilter> {
    level.parse::<LevelFilter>().map_err(|_| {
        anyhow::anyhow!(
            "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
            level
        )
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (before logging setup)
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Determine log level: environment variable overrides config
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.server.logs.level.clone());

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match validate_log_level(&log_level) {
            Ok(level) => EnvFilter::default().add_directive(level.into()),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
    };

    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    info!("Starting image edit relay with log level: {}", log_level);
    info!("Configuration loaded successfully");
    if config.image_api.has_placeholder_key() {
        warn!("OPENAI_API_KEY is not set; image edit calls will fail authentication");
    }

    server::run(config).await?;

    Ok(())
}
