//! Persisted model types.

use serde::{Deserialize, Serialize};

/// A named browser session.
///
/// Created lazily on first reference by name; never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// Row id.
    pub id: i64,
    /// Globally unique session name.
    pub name: String,
}

/// A URL opened and pinned when its session launches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PinnedTab {
    /// Row id.
    pub id: i64,
    /// Owning session.
    pub session_id: i64,
    /// URL (or URL substring) to pin.
    pub url: String,
}

/// A website/username/password triple used for auto-fill.
///
/// The password is stored and embedded in generated scripts in plaintext,
/// matching the on-disk format this tool has always used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Credential {
    /// Row id.
    pub id: i64,
    /// Owning session.
    pub session_id: i64,
    /// Website substring matched against the page URL.
    pub website: String,
    /// Username filled into text/email inputs.
    pub username: String,
    /// Password filled into password inputs.
    pub password: String,
}
