//! Application configuration layered from defaults, a TOML file and the environment.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Directory under the user's config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "timeline-admin";
/// Name of the configuration file.
pub const CONFIG_FILE: &str = "config.toml";
/// Prefix for environment overrides (`TIMELINE_ADMIN_API_BASE`, ...).
pub const ENV_PREFIX: &str = "TIMELINE_ADMIN";
/// Backend API root used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

const DEFAULT_CONFIG_TOML: &str = r#"# timeline-admin configuration
#
# Every key may also be set through the environment, e.g.
# TIMELINE_ADMIN_API_BASE=http://example.com/api

# Root of the timeline REST API.
api_base = "http://localhost:8000/api"

# Regenerate the published JSON after every successful change.
auto_generate = true

# Quiet period before title edits are saved.
debounce_ms = 1000

# How long floating notifications stay visible.
notification_ttl_ms = 3000

# Number of entries kept in the log panel.
log_capacity = 20

# Where exports and HTML snapshots are written.
export_dir = "."
export_file_name = "timeline-export.json"

# Remove rows instead of flagging them inactive.
hard_delete = false
"#;

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root URL every relative API path is appended to.
    pub api_base: String,
    /// Whether mutations trigger a background regenerate.
    pub auto_generate: bool,
    /// Debounce window for title/text edits, in milliseconds.
    pub debounce_ms: u64,
    /// Lifetime of a floating notification, in milliseconds.
    pub notification_ttl_ms: u64,
    /// Maximum entries retained in the log panel.
    pub log_capacity: usize,
    /// Directory receiving exports.
    pub export_dir: PathBuf,
    /// File name used for the raw export.
    pub export_file_name: String,
    /// Send `soft=false` on deletes.
    pub hard_delete: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            auto_generate: true,
            debounce_ms: 1000,
            notification_ttl_ms: 3000,
            log_capacity: 20,
            export_dir: PathBuf::from("."),
            export_file_name: "timeline-export.json".to_string(),
            hard_delete: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file location plus environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration from an explicit file (which may be absent).
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let defaults = AppConfig::default();
        let settings = Config::builder()
            .set_default("api_base", defaults.api_base.clone())?
            .set_default("auto_generate", defaults.auto_generate)?
            .set_default("debounce_ms", defaults.debounce_ms)?
            .set_default("notification_ttl_ms", defaults.notification_ttl_ms)?
            .set_default("log_capacity", defaults.log_capacity as u64)?
            .set_default("export_dir", defaults.export_dir.to_string_lossy().to_string())?
            .set_default("export_file_name", defaults.export_file_name.clone())?
            .set_default("hard_delete", defaults.hard_delete)?
            .add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;

        let config: AppConfig = settings
            .try_deserialize()
            .context("failed to parse configuration")?;
        Ok(config.normalized())
    }

    /// Debounce window as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Notification lifetime as a [`Duration`].
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    /// Full path of the raw export file.
    pub fn export_path(&self) -> PathBuf {
        self.export_dir.join(&self.export_file_name)
    }

    /// Full path of the rendered HTML snapshot.
    pub fn snapshot_path(&self) -> PathBuf {
        self.export_dir.join("timeline-admin.html")
    }

    fn normalized(mut self) -> Self {
        let trimmed = self.api_base.trim().trim_end_matches('/');
        self.api_base = if trimmed.is_empty() {
            DEFAULT_API_BASE.to_string()
        } else {
            trimmed.to_string()
        };
        self.log_capacity = self.log_capacity.max(1);
        if self.export_file_name.trim().is_empty() {
            self.export_file_name = AppConfig::default().export_file_name;
        }
        self
    }
}

/// Default location of the configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write the commented default configuration if no file exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("failed to write default config {}", path.display()))
}
