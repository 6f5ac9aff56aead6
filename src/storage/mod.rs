//! Namespaced key-value store.
//!
//! A [`Store`] is opened explicitly from [`StorageOptions`] and passed to
//! whoever needs it; there is no process-wide handle. Every key is stored
//! under the configured base prefix, and callers only ever see the part after
//! it. Once [`Store::close`] has run, every operation fails with
//! [`StorageError::Closed`].

use std::sync::atomic::{AtomicBool, Ordering};

use derive_more::{Display, From};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use strum_macros::{Display as StrumDisplay, EnumString};

pub mod memory;
pub mod mysql;
pub mod scans;

use memory::MemoryDriver;
use mysql::MySqlDriver;

pub const DEFAULT_BASE: &str = "desiin:";
pub const DEFAULT_DB_NAME: &str = "desiin";
pub const DEFAULT_STORE_NAME: &str = "scans";

/// Backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageDriver {
    /// moka cache, lives as long as the process
    Memory,
    /// `kv_store` table through an sqlx pool
    MySql,
}

#[derive(Debug, Clone)]
pub struct StorageOptions {
    pub driver: StorageDriver,
    /// Key prefix, e.g. `desiin:`
    pub base: String,
    pub db_name: String,
    pub store_name: String,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            driver: StorageDriver::Memory,
            base: DEFAULT_BASE.to_string(),
            db_name: DEFAULT_DB_NAME.to_string(),
            store_name: DEFAULT_STORE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Display, From)]
pub enum StorageError {
    #[display(fmt = "store is closed")]
    #[from(ignore)]
    Closed,
    #[display(fmt = "{} driver requires DATABASE_URL", _0)]
    #[from(ignore)]
    MissingDatabaseUrl(StorageDriver),
    #[display(fmt = "storage backend error: {}", _0)]
    Backend(sqlx::Error),
    #[display(fmt = "stored value is not valid: {}", _0)]
    Value(serde_json::Error),
}

impl std::error::Error for StorageError {}

enum Driver {
    Memory(MemoryDriver),
    MySql(MySqlDriver),
}

pub struct Store {
    base: String,
    driver: Driver,
    closed: AtomicBool,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let driver = match self.driver {
            Driver::Memory(_) => StorageDriver::Memory,
            Driver::MySql(_) => StorageDriver::MySql,
        };
        f.debug_struct("Store")
            .field("base", &self.base)
            .field("driver", &driver)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Store {
    /// Open a store. Backend initialization errors are returned as-is.
    pub async fn open(
        options: &StorageOptions,
        database_url: Option<&str>,
    ) -> Result<Self, StorageError> {
        let driver = match options.driver {
            StorageDriver::Memory => Driver::Memory(MemoryDriver::new()),
            StorageDriver::MySql => {
                let url = database_url.ok_or(StorageError::MissingDatabaseUrl(options.driver))?;
                let namespace = format!("{}/{}", options.db_name, options.store_name);
                Driver::MySql(MySqlDriver::connect(url, namespace).await?)
            }
        };

        tracing::info!(
            driver = %options.driver,
            base = %options.base,
            db_name = %options.db_name,
            store_name = %options.store_name,
            "store opened"
        );

        Ok(Self {
            base: options.base.clone(),
            driver,
            closed: AtomicBool::new(false),
        })
    }

    /// In-memory store with the default namespace.
    pub fn in_memory() -> Self {
        Self {
            base: DEFAULT_BASE.to_string(),
            driver: Driver::Memory(MemoryDriver::new()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<(), StorageError> {
        if self.is_closed() {
            Err(StorageError::Closed)
        } else {
            Ok(())
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.base, key)
    }

    pub async fn get_item(&self, key: &str) -> Result<Option<Value>, StorageError> {
        self.ensure_open()?;
        let key = self.full_key(key);
        match &self.driver {
            Driver::Memory(d) => Ok(d.get(&key).await),
            Driver::MySql(d) => d.get(&key).await,
        }
    }

    pub async fn set_item(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.ensure_open()?;
        let key = self.full_key(key);
        match &self.driver {
            Driver::Memory(d) => {
                d.set(key, value).await;
                Ok(())
            }
            Driver::MySql(d) => d.set(&key, &value).await,
        }
    }

    pub async fn has_item(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get_item(key).await?.is_some())
    }

    pub async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.ensure_open()?;
        let key = self.full_key(key);
        match &self.driver {
            Driver::Memory(d) => {
                d.remove(&key).await;
                Ok(())
            }
            Driver::MySql(d) => d.remove(&key).await,
        }
    }

    /// Keys under `prefix`, with the base stripped, in ascending order.
    pub async fn get_keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        self.ensure_open()?;
        let prefix = self.full_key(prefix);
        let mut keys = match &self.driver {
            Driver::Memory(d) => d.keys(&prefix),
            Driver::MySql(d) => d.keys(&prefix).await?,
        };
        keys.sort();

        Ok(keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(&self.base).map(str::to_string))
            .collect())
    }

    /// Remove every key under this store's base.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.ensure_open()?;
        match &self.driver {
            Driver::Memory(d) => {
                d.clear(&self.base).await;
                Ok(())
            }
            Driver::MySql(d) => d.clear(&self.base).await,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.get_item(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        self.set_item(key, serde_json::to_value(value)?).await
    }

    /// End the store's lifecycle. Closing twice is a no-op.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Driver::MySql(d) = &self.driver {
            d.close().await;
        }
        tracing::info!(base = %self.base, "store closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn driver_parses_from_config_value() {
        assert_eq!("memory".parse::<StorageDriver>().unwrap(), StorageDriver::Memory);
        assert_eq!("MySQL".parse::<StorageDriver>().unwrap(), StorageDriver::MySql);
        assert!("indexeddb".parse::<StorageDriver>().is_err());
        assert_eq!(StorageDriver::MySql.to_string(), "mysql");
    }

    #[actix_web::test]
    async fn set_get_remove_round() {
        let store = Store::in_memory();

        assert_eq!(store.get_item("a").await.unwrap(), None);
        store.set_item("a", json!({"n": 1})).await.unwrap();
        assert_eq!(store.get_item("a").await.unwrap(), Some(json!({"n": 1})));
        assert!(store.has_item("a").await.unwrap());

        store.remove_item("a").await.unwrap();
        assert!(!store.has_item("a").await.unwrap());
    }

    #[actix_web::test]
    async fn keys_are_listed_without_base_and_sorted() {
        let store = Store::in_memory();
        store.set_item("scans:2", json!(2)).await.unwrap();
        store.set_item("scans:1", json!(1)).await.unwrap();
        store.set_item("other", json!(0)).await.unwrap();

        assert_eq!(store.get_keys("scans:").await.unwrap(), vec!["scans:1", "scans:2"]);
        assert_eq!(store.get_keys("").await.unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn clear_empties_namespace() {
        let store = Store::in_memory();
        store.set_item("x", json!(true)).await.unwrap();
        store.set_item("y", json!(false)).await.unwrap();

        store.clear().await.unwrap();
        assert!(store.get_keys("").await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn typed_helpers_round_through_json() {
        let store = Store::in_memory();
        store.set("numbers", &vec![1u32, 2, 3]).await.unwrap();
        let numbers: Option<Vec<u32>> = store.get("numbers").await.unwrap();
        assert_eq!(numbers, Some(vec![1, 2, 3]));

        store.set_item("bad", json!("text")).await.unwrap();
        let bad = store.get::<Vec<u32>>("bad").await;
        assert!(matches!(bad, Err(StorageError::Value(_))));
    }

    #[actix_web::test]
    async fn operations_fail_after_close() {
        let store = Store::in_memory();
        store.set_item("k", json!(1)).await.unwrap();

        store.close().await;
        store.close().await;

        assert!(store.is_closed());
        assert!(matches!(store.get_item("k").await, Err(StorageError::Closed)));
        assert!(matches!(store.set_item("k", json!(2)).await, Err(StorageError::Closed)));
        assert!(matches!(store.get_keys("").await, Err(StorageError::Closed)));
    }

    #[actix_web::test]
    async fn mysql_driver_needs_database_url() {
        let options = StorageOptions {
            driver: StorageDriver::MySql,
            ..StorageOptions::default()
        };
        let err = Store::open(&options, None).await.unwrap_err();
        assert!(matches!(err, StorageError::MissingDatabaseUrl(StorageDriver::MySql)));
    }

    #[actix_web::test]
    async fn open_memory_uses_configured_base() {
        let options = StorageOptions {
            base: "test:".into(),
            ..StorageOptions::default()
        };
        let store = Store::open(&options, None).await.unwrap();
        store.set_item("k", json!(1)).await.unwrap();
        assert_eq!(store.get_keys("").await.unwrap(), vec!["k"]);
    }
}
