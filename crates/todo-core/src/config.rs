use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_PORT: u16 = 7540;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_WEBDIR: &str = "./web";
pub const DEFAULT_DB_FILE: &str = "scheduler.db";
pub const DEFAULT_CONFIG_FILE: &str = "todo.toml";

/// Service config (todo.toml + TODO_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoConfig {
    /// SQLite file. `None` or empty means `<cwd>/scheduler.db`.
    #[serde(default)]
    pub dbfile: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Directory served at `/`.
    #[serde(default = "default_webdir")]
    pub webdir: String,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            dbfile: None,
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            webdir: DEFAULT_WEBDIR.to_string(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_webdir() -> String {
    DEFAULT_WEBDIR.to_string()
}

impl TodoConfig {
    /// Load config from defaults, then an optional TOML file, then `TODO_*` env vars.
    ///
    /// The file path is the explicit argument, else `todo.toml` in the working
    /// directory. A missing file is skipped.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path.unwrap_or(DEFAULT_CONFIG_FILE);
        debug!(%path, "loading config");

        let config: TodoConfig = Figment::from(Serialized::defaults(TodoConfig::default()))
            .merge(Toml::file(path))
            .merge(
                Env::prefixed("TODO_")
                    .ignore(&["config"])
                    .filter(|key| env_is_set(key.as_str())),
            )
            .extract()
            .map_err(|e| crate::error::TodoError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Resolved database path.
    pub fn db_path(&self) -> crate::error::Result<PathBuf> {
        match self.dbfile.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => Ok(std::env::current_dir()?.join(DEFAULT_DB_FILE)),
        }
    }

    /// Listen address. `bind` must be an IP literal; IPv6 may be bracketed.
    pub fn listen_addr(&self) -> crate::error::Result<SocketAddr> {
        let host = self.bind.trim().trim_start_matches('[').trim_end_matches(']');
        let ip: IpAddr = host.parse().map_err(|e| {
            crate::error::TodoError::Config(format!("invalid bind address {:?}: {e}", self.bind))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Empty `TODO_*` variables count as unset, so `TODO_PORT=` keeps the default.
fn env_is_set(key: &str) -> bool {
    std::env::var(format!("TODO_{}", key.to_uppercase()))
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false)
}
