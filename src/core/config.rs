//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.jukebox/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::monitor::DEFAULT_FAILURE_THRESHOLD;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct JukeboxConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub library: LibraryConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MonitorConfig {
    pub poll_interval_ms: Option<u64>,
    pub failure_threshold: Option<u32>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LibraryConfig {
    pub cache_ttl_secs: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 30;

/// Floor for `poll_interval_ms`.
const MIN_POLL_INTERVAL_MS: u64 = 250;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    pub failure_threshold: u32,
    pub cache_ttl: Duration,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.jukebox/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".jukebox").join("config.toml"))
}

/// Load config from `~/.jukebox/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `JukeboxConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<JukeboxConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(JukeboxConfig::default())
        }
    }
}

pub fn load_config_from(path: &Path) -> Result<JukeboxConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(JukeboxConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: JukeboxConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Jukebox Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [backend]
# base_url = "http://localhost:8000"   # Or set JUKEBOX_BASE_URL, or pass --base-url
# request_timeout_secs = 5

# [monitor]
# poll_interval_ms = 2000
# failure_threshold = 3                # failed polls in a row before "unable to load"

# [library]
# cache_ttl_secs = 30                  # how long artist/album/song lists stay fresh
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &JukeboxConfig, cli_base_url: Option<&str>) -> ResolvedConfig {
    resolve_with_env(config, cli_base_url, std::env::var("JUKEBOX_BASE_URL").ok())
}

fn resolve_with_env(
    config: &JukeboxConfig,
    cli_base_url: Option<&str>,
    env_base_url: Option<String>,
) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli_base_url
        .map(|s| s.to_string())
        .or(env_base_url)
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let poll_interval_ms = config
        .monitor
        .poll_interval_ms
        .unwrap_or(DEFAULT_POLL_INTERVAL_MS);
    if poll_interval_ms < MIN_POLL_INTERVAL_MS {
        warn!(
            "poll_interval_ms = {} is too low, using {}",
            poll_interval_ms, MIN_POLL_INTERVAL_MS
        );
    }

    ResolvedConfig {
        base_url: base_url.trim_end_matches('/').to_string(),
        request_timeout: Duration::from_secs(
            config
                .backend
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        ),
        poll_interval: Duration::from_millis(poll_interval_ms.max(MIN_POLL_INTERVAL_MS)),
        failure_threshold: config
            .monitor
            .failure_threshold
            .unwrap_or(DEFAULT_FAILURE_THRESHOLD)
            .max(1),
        cache_ttl: Duration::from_secs(
            config
                .library
                .cache_ttl_secs
                .unwrap_or(DEFAULT_CACHE_TTL_SECS),
        ),
    }
}
