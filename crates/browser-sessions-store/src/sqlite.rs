//! SQLite session storage.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use browser_sessions_core::{
    Credential, PinnedTab, Session, SessionId, SessionStore, StorageError,
};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

const SCHEMA: &str = include_str!("schema.sql");

/// SQLite storage implementation.
///
/// Wraps an injected connection pool; cloning is cheap and shares the pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database file at `path` and apply the schema.
    ///
    /// # Errors
    /// Returns error if the database cannot be opened or the schema fails to
    /// apply.
    pub async fn connect(path: &Path) -> Result<Self, StorageError> {
        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(opts).await?;
        Self::from_pool(pool).await
    }

    /// Open an in-memory database. Data is lost when the store is dropped.
    ///
    /// # Errors
    /// Returns error if the connection or schema application fails.
    pub async fn in_memory() -> Result<Self, StorageError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        // A single never-reaped connection: each in-memory connection is its
        // own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;
        Self::from_pool(pool).await
    }

    /// Build a store from an existing pool, applying the schema.
    ///
    /// # Errors
    /// Returns error if schema application fails.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StorageError> {
        for stmt in SCHEMA.split(';') {
            let stmt = stmt.trim();
            if !stmt.is_empty() {
                sqlx::query(stmt).execute(&pool).await?;
            }
        }
        Ok(Self { pool })
    }

    /// Access the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn find_session_id(&self, name: &str) -> Result<Option<SessionId>, StorageError> {
        Ok(sqlx::query_scalar("SELECT id FROM sessions WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[async_trait]
impl SessionStore for SqliteStore {
    async fn get_or_create_session(&self, name: &str) -> Result<SessionId, StorageError> {
        if let Some(id) = self.find_session_id(name).await? {
            return Ok(id);
        }

        let inserted = sqlx::query("INSERT INTO sessions (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await;

        match inserted {
            Ok(result) => {
                let id = result.last_insert_rowid();
                tracing::debug!(name, id, "created session");
                Ok(id)
            }
            // Lost a create race; the winner's row is authoritative.
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => self
                .find_session_id(name)
                .await?
                .ok_or_else(|| StorageError::Conflict(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_sessions(&self) -> Result<Vec<Session>, StorageError> {
        Ok(
            sqlx::query_as("SELECT id, name FROM sessions ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn list_pinned_tabs(&self, session_id: SessionId) -> Result<Vec<PinnedTab>, StorageError> {
        Ok(sqlx::query_as(
            "SELECT id, session_id, url FROM pinned_tabs WHERE session_id = ? ORDER BY id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn add_pinned_tab(&self, session_id: SessionId, url: &str) -> Result<i64, StorageError> {
        let result = sqlx::query("INSERT INTO pinned_tabs (session_id, url) VALUES (?, ?)")
            .bind(session_id)
            .bind(url)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    async fn delete_pinned_tab(&self, id: i64) -> Result<(), StorageError> {
        let rows = sqlx::query("DELETE FROM pinned_tabs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if rows == 0 {
            tracing::debug!(id, "delete_pinned_tab: no such row");
        }
        Ok(())
    }

    async fn list_credentials(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<Credential>, StorageError> {
        Ok(sqlx::query_as(
            "SELECT id, session_id, website, username, password FROM credentials \
             WHERE session_id = ? ORDER BY id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn add_credential(
        &self,
        session_id: SessionId,
        website: &str,
        username: &str,
        password: &str,
    ) -> Result<i64, StorageError> {
        let result = sqlx::query(
            "INSERT INTO credentials (session_id, website, username, password) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(session_id)
        .bind(website)
        .bind(username)
        .bind(password)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn delete_credential(&self, id: i64) -> Result<(), StorageError> {
        let rows = sqlx::query("DELETE FROM credentials WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if rows == 0 {
            tracing::debug!(id, "delete_credential: no such row");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn make_store() -> SqliteStore {
        SqliteStore::in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let store = make_store().await;
        let first = store.get_or_create_session("home").await.unwrap();
        let second = store.get_or_create_session("home").await.unwrap();
        assert_eq!(first, second);

        let sessions = store.list_sessions().await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].name, "home");
    }

    #[tokio::test]
    async fn distinct_names_get_distinct_ids() {
        let store = make_store().await;
        let home = store.get_or_create_session("home").await.unwrap();
        let work = store.get_or_create_session("work").await.unwrap();
        assert_ne!(home, work);

        let sessions = store.list_sessions().await.unwrap();
        assert_eq!(
            sessions.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            vec!["home", "work"]
        );
    }

    #[tokio::test]
    async fn added_tab_is_listed_exactly_once() {
        let store = make_store().await;
        let id = store.get_or_create_session("home").await.unwrap();
        store
            .add_pinned_tab(id, "https://mail.example.com")
            .await
            .unwrap();

        let tabs = store.list_pinned_tabs(id).await.unwrap();
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs[0].url, "https://mail.example.com");
        assert_eq!(tabs[0].session_id, id);
    }

    #[tokio::test]
    async fn tabs_keep_insertion_order() {
        let store = make_store().await;
        let id = store.get_or_create_session("home").await.unwrap();
        for url in ["https://a.example", "https://b.example", "https://c.example"] {
            store.add_pinned_tab(id, url).await.unwrap();
        }

        let tabs = store.list_pinned_tabs(id).await.unwrap();
        let urls: Vec<_> = tabs.iter().map(|t| t.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://a.example", "https://b.example", "https://c.example"]
        );
    }

    #[tokio::test]
    async fn deleting_nonexistent_tab_is_noop() {
        let store = make_store().await;
        store.delete_pinned_tab(9999).await.unwrap();
        store.delete_credential(9999).await.unwrap();
    }

    #[tokio::test]
    async fn delete_removes_only_the_target_tab() {
        let store = make_store().await;
        let id = store.get_or_create_session("home").await.unwrap();
        let keep = store.add_pinned_tab(id, "https://keep.example").await.unwrap();
        let gone = store.add_pinned_tab(id, "https://drop.example").await.unwrap();

        store.delete_pinned_tab(gone).await.unwrap();

        let tabs = store.list_pinned_tabs(id).await.unwrap();
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs[0].id, keep);
    }

    #[tokio::test]
    async fn credentials_are_scoped_per_session() {
        let store = make_store().await;
        let work = store.get_or_create_session("work").await.unwrap();
        let home = store.get_or_create_session("home").await.unwrap();
        store
            .add_credential(work, "example.com", "bob", "secret")
            .await
            .unwrap();

        let creds = store.list_credentials(work).await.unwrap();
        assert_eq!(creds.len(), 1);
        assert_eq!(creds[0].website, "example.com");
        assert_eq!(creds[0].username, "bob");
        assert_eq!(creds[0].password, "secret");

        assert!(store.list_credentials(home).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fields_round_trip_unchanged() {
        // No normalization, no case-folding.
        let store = make_store().await;
        let id = store.get_or_create_session("Mixed Case Name").await.unwrap();
        store
            .add_pinned_tab(id, "HTTPS://Example.COM/Path?q=1 ")
            .await
            .unwrap();
        store
            .add_credential(id, "Example.COM", "Bob O'Brien", " p@ss word ")
            .await
            .unwrap();

        let sessions = store.list_sessions().await.unwrap();
        assert_eq!(sessions[0].name, "Mixed Case Name");

        let tabs = store.list_pinned_tabs(id).await.unwrap();
        assert_eq!(tabs[0].url, "HTTPS://Example.COM/Path?q=1 ");

        let creds = store.list_credentials(id).await.unwrap();
        assert_eq!(creds[0].website, "Example.COM");
        assert_eq!(creds[0].username, "Bob O'Brien");
        assert_eq!(creds[0].password, " p@ss word ");
    }
}
