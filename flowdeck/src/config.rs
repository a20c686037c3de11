//! Configuration for the Flowdeck client.
//!
//! Layered, highest priority first:
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/flowdeck/config.toml`)
//! 4. Compiled defaults
//!
//! A missing default config file is not an error; an explicit `--config`
//! path that does not exist is.

use std::path::PathBuf;
use std::time::Duration;

use crate::reconcile::DEFAULT_DEBOUNCE;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    sync: SyncFileConfig,
    demo: DemoFileConfig,
}

/// `[sync]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SyncFileConfig {
    debounce_ms: Option<u64>,
    notice_buffer: Option<usize>,
}

/// `[demo]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct DemoFileConfig {
    display_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Quiet period the reconciler waits after the last change event
    /// before refetching.
    pub debounce: Duration,
    /// Capacity of the executor's notice channel.
    pub notice_buffer: usize,
    /// Display name for the demo session.
    pub display_name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            notice_buffer: 16,
            display_name: "demo".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, that is an
    /// error. Without `--config`, the default path
    /// (`~/.config/flowdeck/config.toml`) is tried and silently ignored
    /// if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve a `ClientConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default. Separated from `load()` to enable
    /// unit testing without CLI parsing.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            debounce: cli
                .debounce_ms
                .or(file.sync.debounce_ms)
                .map_or(defaults.debounce, Duration::from_millis),
            notice_buffer: file.sync.notice_buffer.unwrap_or(defaults.notice_buffer),
            display_name: cli
                .display_name
                .clone()
                .or_else(|| file.demo.display_name.clone())
                .unwrap_or(defaults.display_name),
        }
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Collaborative kanban board client")]
pub struct CliArgs {
    /// Path to config file (default: `~/.config/flowdeck/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Reconciler debounce window in milliseconds.
    #[arg(long, env = "FLOWDECK_DEBOUNCE_MS")]
    pub debounce_ms: Option<u64>,

    /// Display name for the demo session.
    #[arg(long)]
    pub display_name: Option<String>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "FLOWDECK_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/flowdeck.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and a missing
/// file is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            // No config dir available — use defaults.
            return Ok(ConfigFile::default());
        };
        config_dir.join("flowdeck").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
