//! Storage trait and error taxonomy.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Credential, PinnedTab, Session};

/// Session identifier (SQLite rowid).
pub type SessionId = i64;

/// Storage error.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Duplicate session name on insert. Recovered internally by re-reading
    /// the existing row; only surfaces if the re-read finds nothing.
    #[error("session name already exists: {0}")]
    Conflict(String),
    /// Connection or query failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Trait for session storage backends.
///
/// Implementations are injected handles — no process-wide singleton. Each
/// operation acquires and releases its own connection; no transaction spans
/// multiple statements.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Look up a session by name, creating it if absent.
    ///
    /// Calling this twice with the same name returns the same id both times.
    /// A create race between two callers is settled by the unique constraint:
    /// the loser re-reads the winner's row.
    ///
    /// # Errors
    /// Returns `StorageError` if the backing connection is unavailable.
    async fn get_or_create_session(&self, name: &str) -> Result<SessionId, StorageError>;

    /// List all sessions in creation order.
    ///
    /// # Errors
    /// Returns `StorageError` on query failure.
    async fn list_sessions(&self) -> Result<Vec<Session>, StorageError>;

    /// List pinned tabs for a session in insertion order.
    ///
    /// # Errors
    /// Returns `StorageError` on query failure.
    async fn list_pinned_tabs(&self, session_id: SessionId) -> Result<Vec<PinnedTab>, StorageError>;

    /// Add a pinned tab, returning the new row id.
    ///
    /// # Errors
    /// Returns `StorageError` on query failure.
    async fn add_pinned_tab(&self, session_id: SessionId, url: &str) -> Result<i64, StorageError>;

    /// Delete a pinned tab. A nonexistent id is a no-op, not an error.
    ///
    /// # Errors
    /// Returns `StorageError` on query failure.
    async fn delete_pinned_tab(&self, id: i64) -> Result<(), StorageError>;

    /// List credentials for a session in insertion order.
    ///
    /// # Errors
    /// Returns `StorageError` on query failure.
    async fn list_credentials(&self, session_id: SessionId)
    -> Result<Vec<Credential>, StorageError>;

    /// Add a credential, returning the new row id.
    ///
    /// # Errors
    /// Returns `StorageError` on query failure.
    async fn add_credential(
        &self,
        session_id: SessionId,
        website: &str,
        username: &str,
        password: &str,
    ) -> Result<i64, StorageError>;

    /// Delete a credential. A nonexistent id is a no-op, not an error.
    ///
    /// # Errors
    /// Returns `StorageError` on query failure.
    async fn delete_credential(&self, id: i64) -> Result<(), StorageError>;
}
