use moka::future::Cache;
use serde_json::Value;

/// Unbounded moka cache: no capacity, TTL or idle limit, so nothing is ever
/// evicted. Entries leave only through `remove` or `clear`.
pub struct MemoryDriver {
    cache: Cache<String, Value>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self {
            cache: Cache::builder().build(),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.cache.get(key).await
    }

    pub async fn set(&self, key: String, value: Value) {
        self.cache.insert(key, value).await;
    }

    pub async fn remove(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    pub fn keys(&self, prefix: &str) -> Vec<String> {
        self.cache
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| (*k).clone())
            .collect()
    }

    pub async fn clear(&self, prefix: &str) {
        let keys = self.keys(prefix);
        let removals: Vec<_> = keys.iter().map(|k| self.cache.invalidate(k)).collect();
        futures::future::join_all(removals).await;
    }
}
