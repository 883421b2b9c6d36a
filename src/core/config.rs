//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.termfolio/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::prompt::{DEFAULT_CHAR_DELAY, DEFAULT_PAUSE, Timing};
use crate::core::session::{DEFAULT_CURSOR, DEFAULT_DIR, DEFAULT_HOST, DEFAULT_USER, Session};
use crate::core::tree::TreeEntry;
use crate::source::github::DEFAULT_GITHUB_BASE_URL;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TermfolioConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub sites: Vec<TreeEntry>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub account: Option<String>,
    pub user: Option<String>,
    pub host: Option<String>,
    pub dir: Option<String>,
    pub cursor: Option<String>,
    pub char_delay_ms: Option<u64>,
    pub pause_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GitHubConfig {
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_ACCOUNT: &str = "MystPi";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub account: String,
    pub session: Session,
    pub timing: Timing,
    pub github_base_url: String,
    /// `None` falls back to the default sites once the profile is known.
    pub sites: Option<Vec<TreeEntry>>,
    pub plain: bool,
}

/// Values given on the command line. `None` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub account: Option<String>,
    pub user: Option<String>,
    pub host: Option<String>,
    pub char_delay_ms: Option<u64>,
    pub pause_ms: Option<u64>,
    pub plain: bool,
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

/// Returns the path to `~/.termfolio/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".termfolio").join("config.toml"))
}

/// Load config from `~/.termfolio/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `TermfolioConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<TermfolioConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(TermfolioConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<TermfolioConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(TermfolioConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: TermfolioConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# termfolio Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# account = "MystPi"                 # GitHub account to show (or TERMFOLIO_ACCOUNT)
# user = "mystpi"                    # shown as user@host in the prompt
# host = "laptop"
# dir = "~/"
# cursor = "█"
# char_delay_ms = 100                # typing speed
# pause_ms = 250                     # pause after each typed command

# [github]
# base_url = "https://api.github.com"  # Or set GITHUB_API_BASE_URL env var

# Replaces the default list shown by `tree sites`
# [[sites]]
# name = "Home"

# [[sites]]
# name = "Blog"
# url = "/blog"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &TermfolioConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Account: CLI → env → config → default
    let account = cli
        .account
        .clone()
        .or_else(|| std::env::var("TERMFOLIO_ACCOUNT").ok())
        .or_else(|| config.general.account.clone())
        .unwrap_or_else(|| DEFAULT_ACCOUNT.to_string());

    let session = Session {
        user: cli
            .user
            .clone()
            .or_else(|| config.general.user.clone())
            .unwrap_or_else(|| DEFAULT_USER.to_string()),
        host: cli
            .host
            .clone()
            .or_else(|| config.general.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        dir: config
            .general
            .dir
            .clone()
            .unwrap_or_else(|| DEFAULT_DIR.to_string()),
        cursor: config
            .general
            .cursor
            .clone()
            .unwrap_or_else(|| DEFAULT_CURSOR.to_string()),
    };

    // --plain skips the animation entirely
    let timing = if cli.plain {
        Timing::instant()
    } else {
        Timing {
            char_delay: cli
                .char_delay_ms
                .or(config.general.char_delay_ms)
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_CHAR_DELAY),
            pause: cli
                .pause_ms
                .or(config.general.pause_ms)
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_PAUSE),
        }
    };

    // GitHub base URL: env → config → default
    let github_base_url = std::env::var("GITHUB_API_BASE_URL")
        .ok()
        .or_else(|| config.github.base_url.clone())
        .unwrap_or_else(|| DEFAULT_GITHUB_BASE_URL.to_string());

    let sites = if config.sites.is_empty() {
        None
    } else {
        Some(config.sites.clone())
    };

    ResolvedConfig {
        account,
        session,
        timing,
        github_base_url,
        sites,
        plain: cli.plain,
    }
}
