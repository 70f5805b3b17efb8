//! Generated extension bundles.
//!
//! Each launch overwrites two on-disk bundles: an auto-pin extension that
//! pins tabs whose URL contains one of the session's pinned substrings, and
//! (when credentials exist) an auto-fill extension embedding the credential
//! list. Matching is substring-based with first-match-wins ordering.

use std::path::Path;

use browser_sessions_core::Credential;

use crate::launcher::LaunchError;

const AUTO_PIN_SCRIPT: &str = r#"
function checkAndPinTab(tab) {
  if (!tab.url) return;
  for (const urlSubstring of pinnedUrls) {
    if (tab.url.includes(urlSubstring)) {
      chrome.tabs.update(tab.id, { pinned: true });
      break;
    }
  }
}

chrome.tabs.onCreated.addListener((tab) => {
  if (tab.url) {
    checkAndPinTab(tab);
  }
});

chrome.tabs.onUpdated.addListener((tabId, changeInfo, tab) => {
  if (changeInfo.status === "complete" && tab.url) {
    checkAndPinTab(tab);
  }
});

chrome.tabs.query({}, (tabs) => {
  for (const tab of tabs) {
    checkAndPinTab(tab);
  }
});
"#;

const AUTO_FILL_BACKGROUND: &str = r#"
chrome.runtime.onMessage.addListener((request, sender, sendResponse) => {
  if (request.action === "getCredentials") {
    const match = credentials.find((cred) => request.url.includes(cred.website));
    sendResponse(match || null);
  }
});
"#;

const AUTO_FILL_CONTENT: &str = r#"
function fillCredentials(credentials) {
  if (!credentials) return;

  const usernameFields = document.querySelectorAll('input[type="text"], input[type="email"]');
  const passwordFields = document.querySelectorAll('input[type="password"]');

  usernameFields.forEach((field) => {
    if (credentials.username) {
      field.value = credentials.username;
    }
  });

  passwordFields.forEach((field) => {
    field.value = credentials.password;
  });
}

chrome.runtime.sendMessage(
  { action: "getCredentials", url: window.location.href },
  fillCredentials
);
"#;

/// Write the auto-pin bundle into `dir`, overwriting any previous contents.
///
/// # Errors
/// Returns `Filesystem` if the directory or files cannot be written.
pub async fn write_auto_pin_bundle(dir: &Path, urls: &[String]) -> Result<(), LaunchError> {
    create_dir(dir).await?;

    let manifest = serde_json::json!({
        "manifest_version": 3,
        "name": "Auto Pin Tabs",
        "version": "1.0",
        "description": "Automatically pins tabs matching specific URL substrings.",
        "background": { "service_worker": "background.js" },
        "permissions": ["tabs"],
        "host_permissions": ["<all_urls>"],
    });
    write_file(dir, "manifest.json", &serde_json::to_string_pretty(&manifest)?).await?;

    let pinned = serde_json::to_string(urls)?;
    let background = format!("const pinnedUrls = {pinned};\n{AUTO_PIN_SCRIPT}");
    write_file(dir, "background.js", &background).await
}

/// Write the auto-fill bundle into `dir`, overwriting any previous contents.
///
/// The full credential list ends up embedded in `background.js` in plaintext,
/// matching the stored format.
///
/// # Errors
/// Returns `Filesystem` if the directory or files cannot be written.
pub async fn write_auto_fill_bundle(
    dir: &Path,
    credentials: &[Credential],
) -> Result<(), LaunchError> {
    create_dir(dir).await?;

    let manifest = serde_json::json!({
        "manifest_version": 3,
        "name": "Auto Fill Credentials",
        "version": "1.0",
        "description": "Automatically fills credentials for specified websites",
        "permissions": ["activeTab", "scripting"],
        "host_permissions": ["<all_urls>"],
        "background": { "service_worker": "background.js" },
        "content_scripts": [{
            "matches": ["<all_urls>"],
            "js": ["content.js"],
        }],
    });
    write_file(dir, "manifest.json", &serde_json::to_string_pretty(&manifest)?).await?;

    let entries: Vec<serde_json::Value> = credentials
        .iter()
        .map(|c| {
            serde_json::json!({
                "website": c.website,
                "username": c.username,
                "password": c.password,
            })
        })
        .collect();
    let embedded = serde_json::to_string(&entries)?;
    let background = format!("const credentials = {embedded};\n{AUTO_FILL_BACKGROUND}");
    write_file(dir, "background.js", &background).await?;

    write_file(dir, "content.js", AUTO_FILL_CONTENT).await
}

async fn create_dir(dir: &Path) -> Result<(), LaunchError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| LaunchError::Filesystem {
            path: dir.to_path_buf(),
            source,
        })
}

async fn write_file(dir: &Path, name: &str, contents: &str) -> Result<(), LaunchError> {
    let path = dir.join(name);
    tokio::fs::write(&path, contents)
        .await
        .map_err(|source| LaunchError::Filesystem { path, source })
}
