//! Browser command resolution.

use std::path::{Path, PathBuf};

use crate::launcher::LaunchError;

/// Executable names probed in order when no override is configured.
#[cfg(not(any(target_os = "macos", windows)))]
const BROWSER_CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
];

#[cfg(target_os = "macos")]
const BROWSER_CANDIDATES: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "chromium",
    "google-chrome",
];

#[cfg(windows)]
const BROWSER_CANDIDATES: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    "chrome",
    "chromium",
];

/// Resolved browser invocation (program plus any leading arguments carried
/// by an override command line).
#[derive(Debug, Clone)]
pub struct BrowserCommand {
    /// Absolute path to the browser executable.
    pub program: PathBuf,
    /// Arguments from the override, placed before the generated ones.
    pub args: Vec<String>,
}

impl BrowserCommand {
    /// Resolve the browser to launch.
    ///
    /// With an override, the string is split shell-style; the first word is
    /// the executable and the rest become leading arguments. Without one, the
    /// platform candidate list is probed in order.
    ///
    /// # Errors
    /// Returns `InvalidBrowserCommand` if the override cannot be parsed and
    /// `BrowserNotFound` if no executable resolves.
    pub async fn resolve(override_cmd: Option<&str>) -> Result<Self, LaunchError> {
        if let Some(cmd) = override_cmd {
            let mut parts = shlex::split(cmd)
                .ok_or_else(|| LaunchError::InvalidBrowserCommand(cmd.to_string()))?;
            if parts.is_empty() {
                return Err(LaunchError::InvalidBrowserCommand(cmd.to_string()));
            }
            let program = parts.remove(0);
            let program = resolve_executable(&program)
                .await
                .ok_or(LaunchError::BrowserNotFound)?;
            return Ok(Self {
                program,
                args: parts,
            });
        }

        for candidate in BROWSER_CANDIDATES {
            if let Some(program) = resolve_executable(candidate).await {
                return Ok(Self {
                    program,
                    args: Vec::new(),
                });
            }
        }
        Err(LaunchError::BrowserNotFound)
    }
}

/// Resolve an executable: explicit paths first, then PATH lookup.
async fn resolve_executable(executable: &str) -> Option<PathBuf> {
    if executable.trim().is_empty() {
        return None;
    }

    let path = Path::new(executable);
    if path.is_absolute() && path.is_file() {
        return Some(path.to_path_buf());
    }

    which_async(executable).await
}

async fn which_async(executable: &str) -> Option<PathBuf> {
    let executable = executable.to_string();
    tokio::task::spawn_blocking(move || which::which(executable))
        .await
        .ok()
        .and_then(Result::ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn override_with_args_keeps_them_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let exe = tmp.path().join("fake-browser");
        std::fs::write(&exe, b"").unwrap();

        let cmd = format!("{} --incognito --lang=en", exe.display());
        let resolved = BrowserCommand::resolve(Some(&cmd)).await.unwrap();
        assert_eq!(resolved.program, exe);
        assert_eq!(resolved.args, vec!["--incognito", "--lang=en"]);
    }

    #[tokio::test]
    async fn override_pointing_nowhere_is_not_found() {
        let err = BrowserCommand::resolve(Some("/no/such/browser-binary"))
            .await
            .unwrap_err();
        assert!(matches!(err, LaunchError::BrowserNotFound));
    }

    #[tokio::test]
    async fn unparseable_override_is_rejected() {
        let err = BrowserCommand::resolve(Some("chromium \"unterminated"))
            .await
            .unwrap_err();
        assert!(matches!(err, LaunchError::InvalidBrowserCommand(_)));
    }
}
