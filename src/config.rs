//! Process configuration, read from the environment (and `.env` if present).

use std::net::SocketAddr;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct MySqlConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub enum StoreConfig {
    MySql(MySqlConfig),
    Sqlite { url: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    /// Enables the reset endpoint when set.
    pub admin_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| non_empty(name).ok_or(ConfigError::Missing(name));

        let store = match non_empty("DATABASE_URL") {
            Some(url) if url.starts_with("sqlite:") => StoreConfig::Sqlite { url },
            _ => StoreConfig::MySql(MySqlConfig {
                host: required("DB_HOST")?,
                port: parse_port("DB_PORT", non_empty("DB_PORT"), 3306)?,
                user: required("DB_USER")?,
                password: lookup("DB_PASSWORD").unwrap_or_default(),
                database: required("DB_NAME")?,
            }),
        };

        Ok(Self {
            host: non_empty("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_port("PORT", non_empty("PORT"), 3000)?,
            store,
            admin_token: non_empty("ADMIN_TOKEN"),
        })
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::Invalid {
            name: "HOST",
            value: raw,
        })
    }
}

fn parse_port(name: &'static str, raw: Option<String>, default: u16) -> Result<u16, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
