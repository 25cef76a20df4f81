//! Connection settings.
//!
//! Every field has a default, so a partial JSON document or an empty environment still yields a
//! usable [`Config`]: an in-memory SQLite database.

use crate::LateralErr;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbBackend};
use serde::Deserialize;
use std::{str::FromStr, time::Duration};
use tracing::instrument;

/// Environment variable holding the database URL
pub const DATABASE_URL: &str = "DATABASE_URL";
/// Environment variable holding the pool size
pub const DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
/// Environment variable toggling SQLx statement logging
pub const DATABASE_SQLX_LOGGING: &str = "DATABASE_SQLX_LOGGING";
/// Environment variable holding the connection timeout, in seconds
pub const DATABASE_CONNECT_TIMEOUT: &str = "DATABASE_CONNECT_TIMEOUT";

/// Defines how to reach the database
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The URI of the database
    pub database_url: String,
    /// Maximum number of connections for the pool
    pub max_connections: u32,
    /// Connection timeout, in seconds
    pub connect_timeout_secs: u64,
    /// Enable SQLx statement logging
    pub sqlx_logging: bool,
    /// SQLx statement logging level, as a `log` level name
    pub sqlx_logging_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_owned(),
            max_connections: 5,
            connect_timeout_secs: 8,
            sqlx_logging: true,
            sqlx_logging_level: "debug".to_owned(),
        }
    }
}

impl Config {
    pub fn new<T>(database_url: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    /// Read `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`, `DATABASE_CONNECT_TIMEOUT` and
    /// `DATABASE_SQLX_LOGGING`, keeping the defaults for anything unset
    pub fn from_env() -> Result<Self, LateralErr> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars<F>(var: F) -> Result<Self, LateralErr>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = var(DATABASE_URL) {
            config.database_url = url;
        }
        if let Some(value) = var(DATABASE_MAX_CONNECTIONS) {
            config.max_connections = parse_env(DATABASE_MAX_CONNECTIONS, &value)?;
        }
        if let Some(value) = var(DATABASE_CONNECT_TIMEOUT) {
            config.connect_timeout_secs = parse_env(DATABASE_CONNECT_TIMEOUT, &value)?;
        }
        if let Some(value) = var(DATABASE_SQLX_LOGGING) {
            config.sqlx_logging = parse_env(DATABASE_SQLX_LOGGING, &value)?;
        }
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, LateralErr> {
        serde_json::from_str(json).map_err(|e| LateralErr::Config(e.to_string()))
    }

    /// Backend selected by the URL scheme
    pub fn backend(&self) -> Option<DbBackend> {
        [DbBackend::Postgres, DbBackend::MySql, DbBackend::Sqlite]
            .into_iter()
            .find(|backend| backend.is_prefix_of(&self.database_url))
    }

    /// Each pooled connection to an in-memory SQLite database sees its own empty database
    pub fn is_in_memory(&self) -> bool {
        self.backend() == Some(DbBackend::Sqlite)
            && (self.database_url.contains(":memory:") || self.database_url.contains("mode=memory"))
    }

    pub fn connect_options(&self) -> Result<ConnectOptions, LateralErr> {
        let level = log::LevelFilter::from_str(&self.sqlx_logging_level).map_err(|_| {
            LateralErr::Config(format!(
                "unknown sqlx_logging_level `{}`",
                self.sqlx_logging_level
            ))
        })?;
        if self.max_connections == 0 {
            return Err(LateralErr::Config(
                "max_connections must be at least 1".to_owned(),
            ));
        }
        let max_connections = if self.is_in_memory() {
            1
        } else {
            self.max_connections
        };

        let mut opt = ConnectOptions::new(self.database_url.as_str());
        opt.max_connections(max_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .sqlx_logging(self.sqlx_logging)
            .sqlx_logging_level(level);
        Ok(opt)
    }

    #[instrument(level = "debug", skip(self), fields(backend = ?self.backend()))]
    pub async fn connect(&self) -> Result<DatabaseConnection, LateralErr> {
        let db = Database::connect(self.connect_options()?).await?;
        tracing::info!("connected");
        Ok(db)
    }
}

fn parse_env<T>(name: &str, value: &str) -> Result<T, LateralErr>
where
    T: FromStr,
{
    value
        .trim()
        .parse()
        .map_err(|_| LateralErr::Config(format!("cannot parse {name}=`{value}`")))
}
