use std::env;

use anyhow::{Context, Result};
use dotenvy::dotenv;

use crate::storage::{
    DEFAULT_BASE, DEFAULT_DB_NAME, DEFAULT_STORE_NAME, StorageDriver, StorageOptions,
};

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    /// Only needed by the mysql storage driver
    pub database_url: Option<String>,
    pub storage: StorageOptions,

    // Rate limiting
    pub rate_api_per_min: u32,

    pub api_prefix: String,
    pub log_dir: String,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let driver = var_or("STORAGE_DRIVER", "memory");
        let driver: StorageDriver = driver
            .parse()
            .with_context(|| format!("STORAGE_DRIVER must be memory or mysql, got {driver:?}"))?;

        let rate_api_per_min = var_or("RATE_API_PER_MIN", "600")
            .parse()
            .context("RATE_API_PER_MIN must be a number")?;

        Ok(Self {
            server_addr: var_or("SERVER_ADDR", "127.0.0.1:8080"),
            database_url: env::var("DATABASE_URL").ok(),
            storage: StorageOptions {
                driver,
                base: var_or("STORAGE_BASE", DEFAULT_BASE),
                db_name: var_or("STORAGE_DB_NAME", DEFAULT_DB_NAME),
                store_name: var_or("STORAGE_STORE_NAME", DEFAULT_STORE_NAME),
            },
            rate_api_per_min,
            api_prefix: var_or("API_PREFIX", "/api"),
            log_dir: var_or("LOG_DIR", "logs"),
        })
    }
}
