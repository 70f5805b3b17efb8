//! Browser session launcher.
//!
//! Materializes a session's pinned tabs and credentials into companion
//! extension bundles, prepares a per-session profile directory, and starts
//! the browser process pointed at both.

pub mod bundles;
pub mod command;
pub mod launcher;

pub use command::BrowserCommand;
pub use launcher::{LaunchError, LaunchSummary, LauncherConfig, SessionLauncher};
