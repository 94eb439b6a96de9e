//! Configuration loading and management.
//!
//! Sources, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. YAML file (`--config`, `TASK_LIST_CONFIG_PATH`, or `./task-list.yaml`)
//! 3. Environment variables
//! 4. CLI flags (applied by the binary)
//!
//! ## Environment Variables
//! - `TASK_LIST_CONFIG_PATH` - Config file path
//! - `TASK_LIST_HOST` - Listen address
//! - `TASK_LIST_PORT` - Listen port
//! - `TASK_LIST_PAGE_TITLE` - Title shown on the task page
//! - `TASK_LIST_DB_PATH` - Database path

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "task-list.yaml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Heading and `<title>` of the task page.
    #[serde(default = "default_page_title")]
    pub page_title: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            page_title: default_page_title(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    4656
}

fn default_page_title() -> String {
    "Tasks".to_string()
}

/// Database connection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// How long a statement waits on a locked database.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("task-list.db")
}

fn default_busy_timeout() -> u64 {
    5000
}

impl Config {
    /// Load configuration from file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Resolve the configuration from file and process environment.
    ///
    /// An explicit path must exist. Without one, `TASK_LIST_CONFIG_PATH` is
    /// tried, then [`DEFAULT_CONFIG_FILE`] if present, then defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os("TASK_LIST_CONFIG_PATH").map(PathBuf::from);
        let mut config = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(DEFAULT_CONFIG_FILE)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("TASK_LIST_HOST") {
            match host.parse() {
                Ok(host) => self.server.host = host,
                Err(_) => warn!("Ignoring invalid TASK_LIST_HOST: {}", host),
            }
        }

        if let Some(port) = lookup("TASK_LIST_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid TASK_LIST_PORT: {}", port),
            }
        }

        if let Some(title) = lookup("TASK_LIST_PAGE_TITLE") {
            self.server.page_title = title;
        }

        if let Some(path) = lookup("TASK_LIST_DB_PATH") {
            self.database.path = PathBuf::from(path);
        }
    }
}
