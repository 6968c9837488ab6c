//! Document store for the donor's provided details.
//!
//! # Database: `PostgreSQL`
//!
//! Each LPA is one JSON document:
//!
//! ## Tables
//!
//! - `donor.lpa_document` - `Provided` serialized to JSONB, keyed by LPA ID
//!
//! # Migrations
//!
//! Migrations are stored in `crates/donor/migrations/` and applied at startup
//! by [`DonorStore::migrate`].
//!
//! Without a database URL the store keeps documents in memory, which is what
//! the tests and local runs use.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use make_lpa_core::{LpaId, Provided};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::instrument;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document exists for the LPA.
    #[error("not found: {0}")]
    NotFound(LpaId),

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A document could not be converted to or from JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Where donor documents are kept.
#[derive(Clone)]
pub enum DonorStore {
    Postgres(PgPool),
    Memory(Arc<RwLock<HashMap<LpaId, serde_json::Value>>>),
}

impl std::fmt::Debug for DonorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Postgres(_) => f.write_str("DonorStore::Postgres"),
            Self::Memory(_) => f.write_str("DonorStore::Memory"),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
}

impl DonorStore {
    /// An empty in-memory store.
    #[must_use]
    pub fn memory() -> Self {
        Self::Memory(Arc::default())
    }

    /// Connect to `PostgreSQL`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the connection cannot be established.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        Ok(Self::Postgres(create_pool(database_url).await?))
    }

    /// Apply pending migrations. Does nothing for the in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if a migration fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        if let Self::Postgres(pool) = self {
            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .map_err(sqlx::Error::from)?;
        }
        Ok(())
    }

    /// Check the store can be reached.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the database does not respond.
    pub async fn ping(&self) -> Result<(), StoreError> {
        if let Self::Postgres(pool) = self {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }

    /// Get the document for an LPA.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if there is no document for `lpa_id`.
    #[instrument(skip(self), fields(lpa_id = %lpa_id))]
    pub async fn get(&self, lpa_id: &LpaId) -> Result<Provided, StoreError> {
        match self {
            Self::Postgres(pool) => {
                let row: Option<Json<Provided>> =
                    sqlx::query_scalar("SELECT data FROM donor.lpa_document WHERE lpa_id = $1")
                        .bind(lpa_id)
                        .fetch_optional(pool)
                        .await?;

                row.map(|Json(provided)| provided)
                    .ok_or_else(|| StoreError::NotFound(lpa_id.clone()))
            }
            Self::Memory(documents) => {
                let document = documents
                    .read()
                    .await
                    .get(lpa_id)
                    .cloned()
                    .ok_or_else(|| StoreError::NotFound(lpa_id.clone()))?;

                Ok(serde_json::from_value(document)?)
            }
        }
    }

    /// Save the document for an LPA, creating it if needed.
    ///
    /// `updated_at` is set to `now` before saving.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` or `StoreError::Serialization` if the
    /// document cannot be written.
    #[instrument(skip(self, provided), fields(lpa_id = %provided.lpa_id))]
    pub async fn put(&self, provided: &mut Provided, now: DateTime<Utc>) -> Result<(), StoreError> {
        provided.updated_at = now;

        match self {
            Self::Postgres(pool) => {
                sqlx::query(
                    r"
                    INSERT INTO donor.lpa_document (lpa_id, data, updated_at)
                    VALUES ($1, $2, $3)
                    ON CONFLICT (lpa_id)
                    DO UPDATE SET data = EXCLUDED.data, updated_at = EXCLUDED.updated_at
                    ",
                )
                .bind(&provided.lpa_id)
                .bind(Json(&*provided))
                .bind(now)
                .execute(pool)
                .await?;
            }
            Self::Memory(documents) => {
                let document = serde_json::to_value(&*provided)?;
                documents
                    .write()
                    .await
                    .insert(provided.lpa_id.clone(), document);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use make_lpa_core::{Actor, Address};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 5, 6, 7).unwrap()
    }

    #[tokio::test]
    async fn test_memory_put_then_get() {
        let store = DonorStore::memory();
        let mut provided = Provided {
            donor: Actor {
                first_names: "Sam".to_string(),
                address: Address {
                    line1: "1 Road".to_string(),
                    ..Address::default()
                },
                ..Actor::default()
            },
            ..Provided::new(LpaId::new("lpa-id"))
        };

        store.put(&mut provided, now()).await.unwrap();
        assert_eq!(provided.updated_at, now());

        let fetched = store.get(&LpaId::new("lpa-id")).await.unwrap();
        assert_eq!(fetched, provided);
    }

    #[tokio::test]
    async fn test_memory_get_missing() {
        let store = DonorStore::memory();
        let err = store.get(&LpaId::new("missing")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id.as_str() == "missing"));
    }

    #[tokio::test]
    async fn test_memory_put_replaces() {
        let store = DonorStore::memory();
        let mut provided = Provided::new(LpaId::new("lpa-id"));
        store.put(&mut provided, now()).await.unwrap();

        provided.donor.last_name = "Smith".to_string();
        store.put(&mut provided, now()).await.unwrap();

        let fetched = store.get(&LpaId::new("lpa-id")).await.unwrap();
        assert_eq!(fetched.donor.last_name, "Smith");
    }

    #[tokio::test]
    async fn test_memory_ping_and_migrate() {
        let store = DonorStore::memory();
        store.migrate().await.unwrap();
        store.ping().await.unwrap();
    }
}
