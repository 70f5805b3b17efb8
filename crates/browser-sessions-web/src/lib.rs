//! HTML form interface for managing browser sessions.
//!
//! Provides `create_router`, an axum router over an injected store and
//! launcher. Plain form POST/GET pairs, no JSON API, no auth.

pub mod pages;

use std::sync::Arc;

use axum::{
    Router,
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use browser_sessions_core::{SessionStore, StorageError};
use browser_sessions_launcher::{LaunchError, SessionLauncher};
use serde::Deserialize;
use thiserror::Error;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
pub struct WebState<S> {
    /// Session store handle.
    pub store: Arc<S>,
    /// Launcher for the run-session route.
    pub launcher: Arc<SessionLauncher<S>>,
}

// Manual impl: `S` itself need not be `Clone` behind the `Arc`s.
impl<S> Clone for WebState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            launcher: Arc::clone(&self.launcher),
        }
    }
}

/// Request handling error, rendered as a plain 500.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("launch error: {0}")]
    Launch(#[from] LaunchError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {self}");
        (StatusCode::INTERNAL_SERVER_ERROR, format!("internal error: {self}")).into_response()
    }
}

#[derive(Deserialize)]
struct CreateSessionForm {
    session_name: String,
}

#[derive(Deserialize)]
struct AddTabForm {
    url: String,
}

#[derive(Deserialize)]
struct AddCredentialForm {
    website: String,
    #[serde(default)]
    username: String,
    password: String,
}

/// Build the web router.
#[must_use]
pub fn create_router<S>(store: Arc<S>, launcher: Arc<SessionLauncher<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route("/", get(index::<S>))
        .route("/create_session", post(create_session::<S>))
        .route("/session/{name}", get(session_view::<S>))
        .route("/session/{name}/add_pinned_tab", post(add_pinned_tab::<S>))
        .route(
            "/session/{name}/delete_pinned_tab/{id}",
            post(delete_pinned_tab::<S>),
        )
        .route("/session/{name}/add_credential", post(add_credential::<S>))
        .route(
            "/session/{name}/delete_credential/{id}",
            post(delete_credential::<S>),
        )
        .route("/run_session/{name}", get(run_session::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(WebState { store, launcher })
}

fn session_path(name: &str) -> String {
    format!("/session/{}", pages::encode_segment(name))
}

async fn index<S: SessionStore>(
    State(state): State<WebState<S>>,
) -> Result<Html<String>, WebError> {
    let sessions = state.store.list_sessions().await?;
    Ok(Html(pages::index_page(&sessions)))
}

async fn create_session<S: SessionStore>(
    State(state): State<WebState<S>>,
    Form(form): Form<CreateSessionForm>,
) -> Result<Redirect, WebError> {
    if !form.session_name.is_empty() {
        state.store.get_or_create_session(&form.session_name).await?;
    }
    Ok(Redirect::to("/"))
}

async fn session_view<S: SessionStore>(
    State(state): State<WebState<S>>,
    Path(name): Path<String>,
) -> Result<Html<String>, WebError> {
    // Viewing a session creates it if needed, same as launching it.
    let session_id = state.store.get_or_create_session(&name).await?;
    let tabs = state.store.list_pinned_tabs(session_id).await?;
    let credentials = state.store.list_credentials(session_id).await?;
    Ok(Html(pages::session_page(&name, &tabs, &credentials)))
}

async fn add_pinned_tab<S: SessionStore>(
    State(state): State<WebState<S>>,
    Path(name): Path<String>,
    Form(form): Form<AddTabForm>,
) -> Result<Redirect, WebError> {
    let session_id = state.store.get_or_create_session(&name).await?;
    if !form.url.is_empty() {
        state.store.add_pinned_tab(session_id, &form.url).await?;
    }
    Ok(Redirect::to(&session_path(&name)))
}

async fn delete_pinned_tab<S: SessionStore>(
    State(state): State<WebState<S>>,
    Path((name, id)): Path<(String, i64)>,
) -> Result<Redirect, WebError> {
    state.store.delete_pinned_tab(id).await?;
    Ok(Redirect::to(&session_path(&name)))
}

async fn add_credential<S: SessionStore>(
    State(state): State<WebState<S>>,
    Path(name): Path<String>,
    Form(form): Form<AddCredentialForm>,
) -> Result<Redirect, WebError> {
    let session_id = state.store.get_or_create_session(&name).await?;
    if !form.website.is_empty() && !form.password.is_empty() {
        state
            .store
            .add_credential(session_id, &form.website, &form.username, &form.password)
            .await?;
    }
    Ok(Redirect::to(&session_path(&name)))
}

async fn delete_credential<S: SessionStore>(
    State(state): State<WebState<S>>,
    Path((name, id)): Path<(String, i64)>,
) -> Result<Redirect, WebError> {
    state.store.delete_credential(id).await?;
    Ok(Redirect::to(&session_path(&name)))
}

async fn run_session<S: SessionStore>(
    State(state): State<WebState<S>>,
    Path(name): Path<String>,
) -> Result<Redirect, WebError> {
    // Always a fresh profile from the web UI.
    match state.launcher.launch(&name, true).await {
        Ok(summary) => {
            tracing::info!(session = %name, tabs = summary.tabs.len(), "session launched");
        }
        // A browser that fails to start must not take down the server.
        Err(err @ (LaunchError::Spawn { .. } | LaunchError::BrowserNotFound)) => {
            tracing::error!(session = %name, "browser launch failed: {err}");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(Redirect::to(&session_path(&name)))
}
