//! Server-rendered HTML pages.
//!
//! One canonical stylesheet and two page templates, assembled by string
//! building. All user-supplied values pass through `escape`; values placed
//! in URL paths pass through `encode_segment`.

use browser_sessions_core::{Credential, PinnedTab, Session};

const STYLE: &str = r#"
body {
  font-family: 'Segoe UI', Arial, sans-serif;
  max-width: 800px;
  margin: 0 auto;
  padding: 20px;
  background: #f5f5f5;
}
h1, h2 {
  color: #2c3e50;
  border-bottom: 2px solid #3498db;
  padding-bottom: 10px;
}
ul { list-style: none; padding: 0; }
li {
  background: white;
  margin: 10px 0;
  padding: 15px;
  border-radius: 8px;
  box-shadow: 0 2px 4px rgba(0,0,0,0.1);
  display: flex;
  justify-content: space-between;
  align-items: center;
}
.session-name { color: #2c3e50; text-decoration: none; font-weight: bold; font-size: 1.1em; }
.session-name:hover { color: #3498db; }
.session-controls { display: flex; gap: 10px; }
.launch-btn {
  background: #27ae60;
  color: white;
  text-decoration: none;
  padding: 8px 15px;
  border-radius: 4px;
}
.launch-btn:hover { background: #219a52; }
form {
  background: white;
  padding: 20px;
  border-radius: 8px;
  margin: 20px 0;
  box-shadow: 0 2px 4px rgba(0,0,0,0.1);
}
form.inline { display: inline; padding: 0; margin: 0; background: none; box-shadow: none; }
input[type="url"], input[type="text"], input[type="password"] {
  width: 200px;
  padding: 8px;
  margin: 5px;
  border: 1px solid #ddd;
  border-radius: 4px;
}
input[type="submit"] {
  background: #3498db;
  color: white;
  border: none;
  padding: 10px 20px;
  border-radius: 4px;
  cursor: pointer;
}
input[type="submit"]:hover { background: #2980b9; }
.delete-btn {
  background: #e74c3c;
  color: white;
  border: none;
  padding: 5px 10px;
  border-radius: 4px;
  cursor: pointer;
  font-size: 0.9em;
}
.delete-btn:hover { background: #c0392b; }
.back-link { display: inline-block; margin-top: 20px; color: #3498db; text-decoration: none; font-weight: bold; }
.credential-info { display: flex; align-items: center; gap: 10px; }
.website { font-weight: bold; color: #2c3e50; }
.username { color: #7f8c8d; }
.password-field {
  -webkit-text-security: disc;
  background: #eee;
  padding: 3px 8px;
  border-radius: 4px;
}
.show-password { cursor: pointer; color: #3498db; margin: 0 10px; font-size: 0.9em; }
"#;

const TOGGLE_SCRIPT: &str = r#"
function togglePassword(element) {
  const passwordField = element.previousElementSibling;
  if (passwordField.style.webkitTextSecurity === 'none') {
    passwordField.style.webkitTextSecurity = 'disc';
    element.textContent = 'Show';
  } else {
    passwordField.style.webkitTextSecurity = 'none';
    element.textContent = 'Hide';
  }
}
"#;

/// Escape a value for HTML text and attribute positions.
pub(crate) fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a value used as a URL path segment.
pub(crate) fn encode_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

fn page(title: &str, body: &str, script: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head>\n<title>{title}</title>\n<style>{STYLE}</style>\n\
         </head>\n<body>\n{body}{script}</body>\n</html>\n"
    )
}

/// The session list with the create form.
pub(crate) fn index_page(sessions: &[Session]) -> String {
    let mut body = String::from("<h1>Browser Sessions</h1>\n<ul>\n");
    for session in sessions {
        let name = escape(&session.name);
        let href = encode_segment(&session.name);
        body.push_str(&format!(
            "<li>\n\
             <a href=\"/session/{href}\" class=\"session-name\">{name}</a>\n\
             <div class=\"session-controls\">\n\
             <a href=\"/session/{href}\" class=\"launch-btn\">Edit Session</a>\n\
             <a href=\"/run_session/{href}\" class=\"launch-btn\">Launch Session</a>\n\
             </div>\n</li>\n"
        ));
    }
    body.push_str(
        "</ul>\n<h2>Create a New Session</h2>\n\
         <form action=\"/create_session\" method=\"post\">\n\
         <input type=\"text\" name=\"session_name\" placeholder=\"Enter session name\" required>\n\
         <input type=\"submit\" value=\"Create Session\">\n</form>\n",
    );
    page("Browser Sessions", &body, "")
}

/// The session detail view: pinned tabs and credentials with their forms.
pub(crate) fn session_page(name: &str, tabs: &[PinnedTab], credentials: &[Credential]) -> String {
    let title = format!("Session: {}", escape(name));
    let href = encode_segment(name);

    let mut body = format!("<h1>{title}</h1>\n<h2>Pinned Tabs</h2>\n<ul>\n");
    for tab in tabs {
        let url = escape(&tab.url);
        let id = tab.id;
        body.push_str(&format!(
            "<li>\n<span>{url}</span>\n\
             <form class=\"inline\" action=\"/session/{href}/delete_pinned_tab/{id}\" method=\"post\">\n\
             <button class=\"delete-btn\" type=\"submit\" \
             onclick=\"return confirm('Delete this pinned tab?')\">Delete</button>\n\
             </form>\n</li>\n"
        ));
    }
    body.push_str(&format!(
        "</ul>\n<form action=\"/session/{href}/add_pinned_tab\" method=\"post\">\n\
         <input type=\"url\" name=\"url\" placeholder=\"Enter URL to pin\" required>\n\
         <input type=\"submit\" value=\"Add Pinned Tab\">\n</form>\n"
    ));

    body.push_str("<h2>Credentials</h2>\n<ul>\n");
    for cred in credentials {
        let website = escape(&cred.website);
        let username = escape(&cred.username);
        let password = escape(&cred.password);
        let id = cred.id;
        body.push_str(&format!(
            "<li>\n<div class=\"credential-info\">\n\
             <span class=\"website\">{website}</span>\n\
             <span class=\"username\">{username}</span>\n\
             <span class=\"password-field\">{password}</span>\n\
             <span class=\"show-password\" onclick=\"togglePassword(this)\">Show</span>\n\
             </div>\n\
             <form class=\"inline\" action=\"/session/{href}/delete_credential/{id}\" method=\"post\">\n\
             <button class=\"delete-btn\" type=\"submit\" \
             onclick=\"return confirm('Delete this credential?')\">Delete</button>\n\
             </form>\n</li>\n"
        ));
    }
    body.push_str(&format!(
        "</ul>\n<form action=\"/session/{href}/add_credential\" method=\"post\">\n\
         <input type=\"text\" name=\"website\" placeholder=\"Website\" required>\n\
         <input type=\"text\" name=\"username\" placeholder=\"Username\">\n\
         <input type=\"password\" name=\"password\" placeholder=\"Password\" required>\n\
         <input type=\"submit\" value=\"Add Credential\">\n</form>\n\
         <a href=\"/\" class=\"back-link\">&larr; Back to Sessions List</a>\n"
    ));

    let script = format!("<script>{TOGGLE_SCRIPT}</script>\n");
    page(&title, &body, &script)
}
