//! Configuration loading and defaults.
//!
//! Configuration is resolved in order of precedence (highest wins):
//!
//! 1. **Environment variables**: `PORT`, `API_KEY`
//! 2. **Config file**: path via `--config <path>`, or `runstub.toml` in CWD
//! 3. **Compiled defaults**: see each field's default value below
//!
//! The TOML file mirrors the struct hierarchy:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [auth]
//! api_key = ""   # empty = /run is open to all callers
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Everything is read once at startup. Handlers only ever see the resulting
//! immutable [`Config`].

use std::fmt;
use std::path::Path;

use serde::Deserialize;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "runstub.toml";

/// Top-level configuration, deserialized from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind (default `0.0.0.0`).
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port to bind (default 8080). Override with `PORT`.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Credential gating `GET /run`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Shared secret expected in `X-API-Key`. Override with `API_KEY`.
    /// Empty means the endpoint is open.
    #[serde(default)]
    pub api_key: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// tracing filter level (default `info`). Overridden by `RUST_LOG` env var.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AuthConfig {
    /// The configured credential, or `None` when `/run` is unauthenticated.
    pub fn credential(&self) -> Option<&str> {
        if self.api_key.is_empty() {
            None
        } else {
            Some(&self.api_key)
        }
    }
}

impl Config {
    /// Load configuration with the precedence chain: env vars > file > defaults.
    ///
    /// If `path` is `Some`, that file must exist and parse. Otherwise looks for
    /// `runstub.toml` in the current directory, falling back to compiled defaults.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = if let Some(p) = path {
            Self::from_file(Path::new(p))?
        } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
            Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
        } else {
            Config::default()
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply environment overrides using `lookup` to resolve variable names.
    ///
    /// An empty `PORT` is treated as unset. `API_KEY` replaces the file value
    /// whenever it is present, so `API_KEY=` explicitly opens `/run`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").filter(|p| !p.is_empty()) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Some(key) = lookup("API_KEY") {
            self.auth.api_key = key;
        }
        Ok(())
    }

    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Errors surfaced while resolving configuration at startup.
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Read { path: String, source: std::io::Error },
    /// The config file is not valid TOML for [`Config`].
    Parse { path: String, message: String },
    /// `PORT` is set but is not a valid TCP port.
    InvalidPort(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config file {path}: {source}")
            }
            ConfigError::Parse { path, message } => {
                write!(f, "failed to parse config file {path}: {message}")
            }
            ConfigError::InvalidPort(value) => write!(f, "invalid PORT value: {value:?}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}
