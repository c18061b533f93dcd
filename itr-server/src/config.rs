//! Server configuration.
//!
//! Values are layered, later layers winning:
//!
//! | layer            | source                                                   |
//! |------------------|----------------------------------------------------------|
//! | defaults         | [`Config::default`]                                      |
//! | file             | TOML passed with `--config`                              |
//! | environment      | `ITR_BIND_ADDR`, `ITR_DB_BACKEND`, `ITR_DATABASE_URL`, `ITR_LOG_LEVEL` |
//! | command line     | `--bind`, `--backend`, `--db`, `--log-level`             |

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use itr_core::db::DbConfig;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid bind address '{0}'")]
    InvalidBindAddr(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Name of a registered repository backend.
    pub backend: String,
    /// For SQLite, a file path or `:memory:`.
    pub connection_string: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: "itr.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// A bare level or any `EnvFilter` directive. `RUST_LOG` wins over it.
    pub level: String,
    /// Log records are appended here as well as to stdout.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Reads `path` when given, otherwise starts from defaults, then applies
    /// the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Applies `ITR_*` overrides. Empty values are ignored.
    pub fn apply_env<F>(
        &mut self,
        lookup: F,
    ) where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        if let Some(addr) = var("ITR_BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Some(backend) = var("ITR_DB_BACKEND") {
            self.database.backend = backend;
        }
        if let Some(url) = var("ITR_DATABASE_URL") {
            self.database.connection_string = url;
        }
        if let Some(level) = var("ITR_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            backend: self.database.backend.clone(),
            connection_string: self.database.connection_string.clone(),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(self.server.bind_addr.clone()))
    }
}
