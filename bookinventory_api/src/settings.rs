use std::collections::HashMap;
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 8080;

/// Settings of the service, resolved once at startup and handed down explicitly
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerSettings {
    #[serde(rename = "server_host")]
    pub host: String,
    #[serde(rename = "server_port")]
    pub port: u16,
    pub use_in_memory_db: bool,
}

/// Connection parameters of the books database.
///
/// Credentials have no defaults. A missing value is only reported when a connection
/// is first requested, see [`crate::connection::PostgresConnectionProvider::connect`].
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct DatabaseSettings {
    #[serde(rename = "db_host")]
    pub host: Option<String>,
    #[serde(rename = "db_name")]
    pub name: Option<String>,
    #[serde(rename = "db_user")]
    pub user: Option<String>,
    #[serde(rename = "db_pass")]
    pub password: Option<String>,
    #[serde(rename = "db_port")]
    pub port: Option<u16>,
    #[serde(rename = "db_connect_timeout_secs")]
    pub connect_timeout_secs: Option<u64>,
    #[serde(rename = "db_statement_timeout_ms")]
    pub statement_timeout_ms: Option<u64>,
}

impl DatabaseSettings {
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }
}

impl Settings {
    /// Loads settings from the process environment, after applying a `.env` file if one exists
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is not an error
        dotenvy::dotenv().ok();
        Self::from_environment(Environment::default())
    }

    /// Loads settings from the given variables instead of the process environment
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_environment(Environment::default().source(Some(vars)))
    }

    fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server_host", DEFAULT_SERVER_HOST)?
            .set_default("server_port", i64::from(DEFAULT_SERVER_PORT))?
            .set_default("use_in_memory_db", false)?
            .add_source(environment)
            .build()?;

        Ok(Self {
            database: config.clone().try_deserialize()?,
            server: config.try_deserialize()?,
        })
    }
}
