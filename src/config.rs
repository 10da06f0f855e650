use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};

const DEFAULT_LOG_FILTER: &str = "info,pennypress=debug,tower_http=debug";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// SQLite url. When absent, records live in memory for the life of the
    /// process.
    pub database_url: Option<String>,
    pub seed_data: bool,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            database_url: None,
            seed_data: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Reads `HOST`, `PORT`, `DATABASE_URL`, `SEED_DATA` and `RUST_LOG`,
    /// after loading a `.env` file if one is present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();
        let host = match lookup("HOST") {
            Some(host) => host
                .parse()
                .with_context(|| format!("Invalid HOST: {host}"))?,
            None => defaults.host,
        };
        let port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("Invalid PORT: {port}"))?,
            None => defaults.port,
        };
        let seed_data = match lookup("SEED_DATA") {
            Some(value) => parse_bool(&value)
                .with_context(|| format!("Invalid SEED_DATA: {value}"))?,
            None => defaults.seed_data,
        };
        Ok(Config {
            host,
            port,
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            seed_data,
            log_filter: lookup("RUST_LOG").unwrap_or(defaults.log_filter),
        })
    }

    pub fn server_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
