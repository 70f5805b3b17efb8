//! Session launch orchestration.

use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use browser_sessions_core::{SessionId, SessionStore, StorageError};
use thiserror::Error;
use tokio::process::Command;

use crate::bundles;
use crate::command::BrowserCommand;

const AUTO_PIN_DIR: &str = "auto_pin_extension";
const AUTO_FILL_DIR: &str = "auto_fill_extension";

/// Launch error.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("filesystem error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize extension payload: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("invalid browser command: {0}")]
    InvalidBrowserCommand(String),
    #[error("no browser executable found")]
    BrowserNotFound,
    /// Reported but non-fatal: callers log it and keep running.
    #[error("failed to start browser {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Launcher configuration.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// Root directory for profiles and generated extension bundles.
    pub data_dir: PathBuf,
    /// Browser executable or command-line override.
    pub browser: Option<String>,
}

/// What a launch did, for reporting.
#[derive(Debug, Clone)]
pub struct LaunchSummary {
    /// Resolved (possibly freshly created) session id.
    pub session_id: SessionId,
    /// Profile directory passed to the browser.
    pub profile_dir: PathBuf,
    /// Pinned URLs opened as initial tabs.
    pub tabs: Vec<String>,
    /// Websites whose credentials were loaded into the auto-fill bundle.
    pub credential_websites: Vec<String>,
}

/// Launches browser processes for stored sessions.
pub struct SessionLauncher<S> {
    store: Arc<S>,
    config: LauncherConfig,
}

impl<S: SessionStore> SessionLauncher<S> {
    /// Create a new launcher over an injected store.
    #[must_use]
    pub const fn new(store: Arc<S>, config: LauncherConfig) -> Self {
        Self { store, config }
    }

    /// Launch the named session, creating it if it does not exist yet.
    ///
    /// Regenerates the extension bundles, prepares the profile directory
    /// (wiping it first when `fresh` is set), and spawns the browser
    /// fire-and-forget: the child is neither awaited nor monitored.
    ///
    /// # Errors
    /// Storage and filesystem failures abort the launch. A spawn failure is
    /// returned as `LaunchError::Spawn`, which callers treat as non-fatal.
    pub async fn launch(
        &self,
        session_name: &str,
        fresh: bool,
    ) -> Result<LaunchSummary, LaunchError> {
        let session_id = self.store.get_or_create_session(session_name).await?;
        let tabs: Vec<String> = self
            .store
            .list_pinned_tabs(session_id)
            .await?
            .into_iter()
            .map(|t| t.url)
            .collect();
        let credentials = self.store.list_credentials(session_id).await?;

        let profile_dir = self.prepare_profile(session_name, fresh).await?;

        let pin_dir = self.config.data_dir.join(AUTO_PIN_DIR);
        bundles::write_auto_pin_bundle(&pin_dir, &tabs).await?;

        let mut extension_dirs = vec![pin_dir];
        if !credentials.is_empty() {
            let fill_dir = self.config.data_dir.join(AUTO_FILL_DIR);
            bundles::write_auto_fill_bundle(&fill_dir, &credentials).await?;
            extension_dirs.push(fill_dir);
        }

        let browser = BrowserCommand::resolve(self.config.browser.as_deref()).await?;
        let load_extension = extension_dirs
            .iter()
            .map(|d| d.display().to_string())
            .collect::<Vec<_>>()
            .join(",");

        let mut cmd = Command::new(&browser.program);
        cmd.args(&browser.args)
            .arg(format!("--user-data-dir={}", profile_dir.display()))
            .arg("--new-window")
            .arg(format!("--load-extension={load_extension}"))
            .args(&tabs)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // Fire-and-forget: the browser is expected to outlive this process.
        if let Err(source) = cmd.spawn() {
            return Err(LaunchError::Spawn {
                program: browser.program.display().to_string(),
                source,
            });
        }

        let credential_websites: Vec<String> =
            credentials.into_iter().map(|c| c.website).collect();
        tracing::info!(
            session = session_name,
            profile = %profile_dir.display(),
            tabs = ?tabs,
            credentials = ?credential_websites,
            "launched browser session"
        );

        Ok(LaunchSummary {
            session_id,
            profile_dir,
            tabs,
            credential_websites,
        })
    }

    async fn prepare_profile(
        &self,
        session_name: &str,
        fresh: bool,
    ) -> Result<PathBuf, LaunchError> {
        let profile_dir = self.config.data_dir.join("profiles").join(session_name);

        if fresh {
            match tokio::fs::remove_dir_all(&profile_dir).await {
                Ok(()) => tracing::debug!(profile = %profile_dir.display(), "wiped profile"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(LaunchError::Filesystem {
                        path: profile_dir,
                        source,
                    });
                }
            }
        }

        tokio::fs::create_dir_all(&profile_dir)
            .await
            .map_err(|source| LaunchError::Filesystem {
                path: profile_dir.clone(),
                source,
            })?;

        Ok(profile_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use browser_sessions_store::SqliteStore;

    async fn seeded_store() -> Arc<SqliteStore> {
        Arc::new(SqliteStore::in_memory().await.unwrap())
    }

    fn launcher(
        store: &Arc<SqliteStore>,
        data_dir: &std::path::Path,
        browser: &str,
    ) -> SessionLauncher<SqliteStore> {
        SessionLauncher::new(
            Arc::clone(store),
            LauncherConfig {
                data_dir: data_dir.to_path_buf(),
                browser: Some(browser.to_string()),
            },
        )
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn fresh_launch_wipes_profile_and_embeds_tab_urls() {
        let tmp = tempfile::tempdir().unwrap();
        let store = seeded_store().await;
        let id = store.get_or_create_session("home").await.unwrap();
        store
            .add_pinned_tab(id, "https://mail.example.com")
            .await
            .unwrap();

        // Stale profile content that a fresh launch must remove.
        let profile = tmp.path().join("profiles").join("home");
        std::fs::create_dir_all(&profile).unwrap();
        std::fs::write(profile.join("stale.txt"), "old").unwrap();

        let summary = launcher(&store, tmp.path(), "true")
            .launch("home", true)
            .await
            .unwrap();

        assert_eq!(summary.session_id, id);
        assert_eq!(summary.tabs, vec!["https://mail.example.com"]);
        assert!(summary.credential_websites.is_empty());
        assert!(profile.is_dir());
        assert!(!profile.join("stale.txt").exists());

        let script =
            std::fs::read_to_string(tmp.path().join("auto_pin_extension/background.js")).unwrap();
        assert!(script.starts_with(r#"const pinnedUrls = ["https://mail.example.com"];"#));

        // No credentials stored, so no auto-fill bundle.
        assert!(!tmp.path().join("auto_fill_extension").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn launch_generates_auto_fill_bundle_when_credentials_exist() {
        let tmp = tempfile::tempdir().unwrap();
        let store = seeded_store().await;
        let id = store.get_or_create_session("work").await.unwrap();
        store
            .add_credential(id, "example.com", "bob", "secret")
            .await
            .unwrap();

        let summary = launcher(&store, tmp.path(), "true")
            .launch("work", false)
            .await
            .unwrap();

        assert_eq!(summary.credential_websites, vec!["example.com"]);
        let background =
            std::fs::read_to_string(tmp.path().join("auto_fill_extension/background.js")).unwrap();
        assert!(background.contains(r#""website":"example.com""#));
        assert!(tmp.path().join("auto_fill_extension/content.js").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn launch_creates_unknown_sessions() {
        let tmp = tempfile::tempdir().unwrap();
        let store = seeded_store().await;

        launcher(&store, tmp.path(), "true")
            .launch("brand-new", false)
            .await
            .unwrap();

        let sessions = store.list_sessions().await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].name, "brand-new");
    }

    #[tokio::test]
    async fn missing_browser_is_reported_not_spawned() {
        let tmp = tempfile::tempdir().unwrap();
        let store = seeded_store().await;

        let err = launcher(&store, tmp.path(), "/no/such/browser-binary")
            .launch("home", false)
            .await
            .unwrap_err();
        assert!(matches!(err, LaunchError::BrowserNotFound));
    }
}
