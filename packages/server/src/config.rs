//! Server configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file
//! (`--config` or `DASHBIKE_CONFIG`), then the `BIND_ADDR`, `PORT` and
//! `DASHBIKE_DATA_DIR` environment variables, then command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use dashbike_dashboard::Boundaries;
use dashbike_dataset::DatasetPaths;
use serde::{Deserialize, Serialize};

use crate::sessions::{DEFAULT_CAPACITY, DEFAULT_TTL, SessionCache};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "DASHBIKE_CONFIG";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8071;

/// Errors raised while reading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for [`ServerConfig`].
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// HTTP port.
    pub port: u16,
    /// Directory served under `/assets`.
    pub assets_dir: PathBuf,
    /// Input CSV files.
    pub dataset: DatasetPaths,
    /// Choropleth boundary locations.
    pub boundaries: Boundaries,
    /// Lifetime of a cached map selection, in seconds.
    pub session_ttl_secs: u64,
    /// Maximum number of cached map selections.
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            assets_dir: PathBuf::from("assets"),
            dataset: DatasetPaths::default(),
            boundaries: Boundaries::default(),
            session_ttl_secs: DEFAULT_TTL.as_secs(),
            max_sessions: DEFAULT_CAPACITY,
        }
    }
}

/// Values given on the command line or in the interactive prompt.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind_addr: Option<String>,
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Reads a configuration file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies environment overrides read through `lookup`. Unparseable
    /// ports are ignored with a warning.
    #[must_use]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(bind_addr) = lookup("BIND_ADDR") {
            self.bind_addr = bind_addr;
        }
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => log::warn!("Ignoring invalid PORT value '{port}'"),
            }
        }
        if let Some(data_dir) = lookup("DASHBIKE_DATA_DIR") {
            self.dataset.data_dir = PathBuf::from(data_dir);
        }
        self
    }

    /// Applies command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(bind_addr) = &overrides.bind_addr {
            self.bind_addr.clone_from(bind_addr);
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(data_dir) = &overrides.data_dir {
            self.dataset.data_dir.clone_from(data_dir);
        }
        self
    }

    /// Session cache sized by this configuration.
    #[must_use]
    pub fn session_cache(&self) -> SessionCache {
        SessionCache::new(Duration::from_secs(self.session_ttl_secs), self.max_sessions)
    }

    /// Resolves the effective configuration from every source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a configuration file is named but cannot
    /// be read or parsed.
    pub fn resolve(config: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let file = config.map(Path::to_path_buf).or(from_env);

        let base = match file {
            Some(path) => {
                log::info!("Reading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        Ok(base
            .with_env(|key| std::env::var(key).ok())
            .with_overrides(overrides))
    }
}
