use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 3030;
pub const DEFAULT_BIND: &str = "127.0.0.1";
/// Env var naming an explicit config file; `--config` on the CLI wins over it.
pub const CONFIG_ENV: &str = "WEEKPLAN_CONFIG";

/// Top-level config (weekplan.toml + WEEKPLAN_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WeekplanConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path. `:memory:` gives a throwaway store.
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl DatabaseConfig {
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.weekplan/weekplan.db", home)
}

impl WeekplanConfig {
    /// Load config from a TOML file with WEEKPLAN_* env var overrides.
    ///
    /// File lookup: explicit path, then `WEEKPLAN_CONFIG`, then
    /// `~/.weekplan/weekplan.toml`. A missing file is not an error; every
    /// field has a default.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .or_else(|| std::env::var(CONFIG_ENV).ok())
            .unwrap_or_else(default_config_path);

        let config: WeekplanConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("WEEKPLAN_").split("_"))
            .extract()
            .map_err(|e| crate::error::WeekplanError::Config(e.to_string()))?;

        Ok(config)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.weekplan/weekplan.toml", home)
}
