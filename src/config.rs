// src/config.rs

use std::{env, net::SocketAddr, str::FromStr};

use dotenvy::dotenv;
use thiserror::Error;

use crate::models::filters::MAX_PAGE_SIZE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    /// Page size used by the feed when the request does not carry a usable one.
    pub default_page_size: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let jwt_expiration = optional("JWT_EXPIRATION", 86_400)?;
        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let bind_addr = optional("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?;

        let default_page_size: i64 = optional("DEFAULT_PAGE_SIZE", 5)?;
        if !(1..=MAX_PAGE_SIZE).contains(&default_page_size) {
            return Err(ConfigError::Invalid {
                name: "DEFAULT_PAGE_SIZE",
                value: default_page_size.to_string(),
            });
        }

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            bind_addr,
            default_page_size,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn optional<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
