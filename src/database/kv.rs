//! Generic key-value store
//!
//! Persists JSON-serialized records under string keys in the `kv` table.
//! The domain services read and write whole records through this store;
//! a missing key surfaces as `None`, a malformed value as an error.

use crate::error::Result;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::SqlitePool;

/// Key-value store over the application database
#[derive(Clone)]
pub struct KvStore {
    pool: SqlitePool,
}

impl KvStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch and deserialize the value stored under `key`, if any.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some((value,)) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }

    /// Serialize `value` and store it under `key`, replacing any prior value.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;

        sqlx::query(
            r#"
            INSERT INTO kv (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(&json)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::debug!("Stored value under key: {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::initialize_database;
    use crate::error::AppError;
    use serde::{Deserialize, Serialize};
    use sqlx::sqlite::SqlitePoolOptions;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    async fn create_test_store() -> KvStore {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        KvStore::new(pool)
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let store = create_test_store().await;

        let value: Option<Sample> = store.get("nothing-here").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_set_then_get_round_trips() {
        let store = create_test_store().await;

        let sample = Sample {
            name: "coffee".to_string(),
            count: 3,
        };

        store.set("sample", &sample).await.unwrap();

        let loaded: Sample = store.get("sample").await.unwrap().unwrap();
        assert_eq!(loaded, sample);
    }

    #[tokio::test]
    async fn test_set_replaces_prior_value() {
        let store = create_test_store().await;

        store
            .set(
                "sample",
                &Sample {
                    name: "a".to_string(),
                    count: 1,
                },
            )
            .await
            .unwrap();
        store
            .set(
                "sample",
                &Sample {
                    name: "b".to_string(),
                    count: 2,
                },
            )
            .await
            .unwrap();

        let loaded: Sample = store.get("sample").await.unwrap().unwrap();
        assert_eq!(loaded.name, "b");
        assert_eq!(loaded.count, 2);
    }

    #[tokio::test]
    async fn test_malformed_value_surfaces_error() {
        let store = create_test_store().await;

        sqlx::query("INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?)")
            .bind("broken")
            .bind("{not json")
            .bind(Utc::now())
            .execute(&store.pool)
            .await
            .unwrap();

        let result: Result<Option<Sample>> = store.get("broken").await;
        assert!(matches!(result, Err(AppError::Serialization(_))));
    }
}
