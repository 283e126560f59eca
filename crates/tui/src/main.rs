mod app;
mod clipboard;

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    sync::Arc,
};

use timeline_admin_core::{
    config::{self, AppConfig},
    ApiClient, Console, TimelineApi,
};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let config_path = config::ensure_default_config()?;
    let config = AppConfig::load()?;
    info!(path = %config_path.display(), api_base = %config.api_base, "Configuration loaded");

    let client = ApiClient::new(config.api_base.clone())
        .context("failed to build HTTP client")?
        .with_hard_delete(config.hard_delete);
    let api: Arc<dyn TimelineApi> = Arc::new(client);
    let console = Console::new(api, &config);

    let mut app = app::App::new(console);
    app.run().await
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("timeline-admin.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::from_default_env();

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
