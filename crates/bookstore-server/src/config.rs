//! Server configuration from the environment.

use anyhow::Context;
use bookstore::PoolConfig;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Where to find the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    /// A full `postgres://` URL or key/value connection string.
    Url(String),
    /// Discrete connection parameters.
    Params {
        host: String,
        port: u16,
        dbname: String,
        user: String,
        password: String,
    },
}

impl DatabaseConfig {
    /// Build the `tokio_postgres` connection config.
    pub fn to_pg_config(&self) -> anyhow::Result<tokio_postgres::Config> {
        match self {
            DatabaseConfig::Url(url) => url
                .parse::<tokio_postgres::Config>()
                .map_err(|e| anyhow::anyhow!("invalid DATABASE_URL: {e}")),
            DatabaseConfig::Params {
                host,
                port,
                dbname,
                user,
                password,
            } => {
                let mut cfg = tokio_postgres::Config::new();
                cfg.host(host)
                    .port(*port)
                    .dbname(dbname)
                    .user(user)
                    .password(password);
                Ok(cfg)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database: DatabaseConfig,
    pub pool: PoolConfig,
    /// How often idle connections are trimmed back to `pool.max_idle`.
    pub reap_interval: Duration,
    pub bind: SocketAddr,
}

impl ServerConfig {
    /// Load from process environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variables. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let database = match get("DATABASE_URL") {
            Some(url) => DatabaseConfig::Url(url),
            None => DatabaseConfig::Params {
                host: get_or("DB_HOST", "localhost"),
                port: parse_var(&get, "DB_PORT", 5432)?,
                dbname: get_or("DB_NAME", "bookstore"),
                user: get_or("DB_USER", "bookstore_user"),
                password: get_or("DB_PASSWORD", ""),
            },
        };

        let defaults = PoolConfig::default();
        let default_lifetime = defaults.max_lifetime.as_secs();
        let lifetime_secs = parse_var(&get, "DB_CONN_MAX_LIFETIME_SECS", default_lifetime)?;
        let pool = PoolConfig {
            max_open: parse_var(&get, "DB_MAX_OPEN_CONNS", defaults.max_open)?,
            max_idle: parse_var(&get, "DB_MAX_IDLE_CONNS", defaults.max_idle)?,
            max_lifetime: Duration::from_secs(lifetime_secs),
        };
        anyhow::ensure!(pool.max_open > 0, "DB_MAX_OPEN_CONNS must be at least 1");

        let host = get_or("BOOKSTORE_BIND", "0.0.0.0");
        let port: u16 = parse_var(&get, "PORT", 8080)?;
        let bind = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid bind address {host}:{port}"))?;

        Ok(Self {
            database,
            pool,
            reap_interval: Duration::from_secs(30),
            bind,
        })
    }
}

fn parse_var<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key} value {raw:?}: {e}")),
        None => Ok(default),
    }
}
