use crate::search::DEFAULT_SEARCH_ENDPOINT;
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 5;

/// Settings read from `Config.toml` (optional) and then the environment.
///
/// Environment variables are unprefixed, so `DB_HOST` fills `db_host`. Values
/// left unset here are asked for interactively at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub db_host: Option<String>,
    #[serde(default)]
    pub db_name: Option<String>,
    #[serde(default)]
    pub db_user: Option<String>,
    #[serde(default)]
    pub db_password: Option<String>,
    #[serde(default)]
    pub db_port: Option<String>,
    #[serde(default)]
    pub serpapi_api_key: Option<String>,
    #[serde(default = "default_search_endpoint")]
    pub search_endpoint: String,
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            db_host: None,
            db_name: None,
            db_user: None,
            db_password: None,
            db_port: None,
            serpapi_api_key: None,
            search_endpoint: default_search_endpoint(),
            download_timeout_secs: default_download_timeout_secs(),
        }
    }
}

impl AppConfig {
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    /// Printable view of the configuration with secrets masked.
    pub fn redacted(&self) -> AppConfig {
        AppConfig {
            database_url: self.database_url.as_ref().map(|_| "***".to_string()),
            db_password: self.db_password.as_ref().map(|_| "***".to_string()),
            serpapi_api_key: self.serpapi_api_key.as_ref().map(|_| "***".to_string()),
            ..self.clone()
        }
    }
}

fn default_search_endpoint() -> String {
    DEFAULT_SEARCH_ENDPOINT.to_string()
}

fn default_download_timeout_secs() -> u64 {
    DEFAULT_DOWNLOAD_TIMEOUT_SECS
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::default())
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

/// The value, unless it is absent or empty.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
