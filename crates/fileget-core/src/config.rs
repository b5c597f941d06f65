use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default total request timeout (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Default number of attempts before giving up.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Defaults loaded from `~/.config/fileget/config.toml`.
///
/// Every field can be overridden per invocation by the matching CLI flag;
/// the file only changes what "not specified" means.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilegetConfig {
    /// Total request timeout in seconds (HTTP only).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Number of attempts before giving up (HTTP only).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// User-Agent sent when `--user-agent` is not given.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Proxy URL used when `--proxy` is not given.
    #[serde(default)]
    pub proxy: Option<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl Default for FilegetConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            user_agent: None,
            proxy: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("fileget")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Loads the config file, writing a default one on first run.
pub fn load_or_init() -> Result<FilegetConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FilegetConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FilegetConfig = toml::from_str(&data)?;
    Ok(cfg)
}
