//! SQLite-backed storage for browser sessions.
//!
//! Provides `SqliteStore`, the `SessionStore` implementation persisting to a
//! SQLite database file.

pub mod sqlite;

pub use sqlite::SqliteStore;
