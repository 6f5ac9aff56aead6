use serde_json::Value;
use sqlx::MySqlPool;

use super::StorageError;
use crate::db::init_db;

/// One table holds every store; rows are keyed by `namespace` (`db/store`)
/// and the fully prefixed key.
const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS kv_store (
        namespace VARCHAR(191) NOT NULL,
        item_key VARCHAR(191) NOT NULL,
        item_value LONGTEXT NOT NULL,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
        PRIMARY KEY (namespace, item_key)
    )
"#;

/// `prefix%` with LIKE wildcards in `prefix` escaped.
fn like_prefix(prefix: &str) -> String {
    let escaped = prefix
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("{}%", escaped)
}

pub struct MySqlDriver {
    pool: MySqlPool,
    namespace: String,
}

impl MySqlDriver {
    pub async fn connect(database_url: &str, namespace: String) -> Result<Self, StorageError> {
        let pool = init_db(database_url).await?;
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        Ok(Self { pool, namespace })
    }

    pub async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let raw = sqlx::query_scalar::<_, String>(
            "SELECT item_value FROM kv_store WHERE namespace = ? AND item_key = ?",
        )
        .bind(&self.namespace)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn set(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (namespace, item_key, item_value)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE item_value = VALUES(item_value)
            "#,
        )
        .bind(&self.namespace)
        .bind(key)
        .bind(value.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv_store WHERE namespace = ? AND item_key = ?")
            .bind(&self.namespace)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let keys = sqlx::query_scalar::<_, String>(
            "SELECT item_key FROM kv_store WHERE namespace = ? AND item_key LIKE ?",
        )
        .bind(&self.namespace)
        .bind(like_prefix(prefix))
        .fetch_all(&self.pool)
        .await?;
        Ok(keys)
    }

    pub async fn clear(&self, prefix: &str) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM kv_store WHERE namespace = ? AND item_key LIKE ?")
            .bind(&self.namespace)
            .bind(like_prefix(prefix))
            .execute(&self.pool)
            .await?;
        tracing::debug!(namespace = %self.namespace, removed = result.rows_affected(), "store cleared");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::like_prefix;

    #[test]
    fn like_prefix_escapes_wildcards() {
        assert_eq!(like_prefix("desiin:scans:"), "desiin:scans:%");
        assert_eq!(like_prefix("a_b%c\\"), "a\\_b\\%c\\\\%");
    }
}
