//! HTTP server implementation for the task list.
//!
//! This module provides the axum-based HTTP server: one page route and five
//! form-post routes, each mapped to a single repository operation.

use axum::{
    Router,
    extract::{Form, State, rejection::FormRejection},
    response::{Html, Redirect},
    routing::{get, post},
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::render::PageRenderer;
use crate::error::{WebError, WebResult};
use crate::repository::TaskRepository;
use crate::types::TaskId;

/// Server state shared across handlers.
#[derive(Clone)]
pub struct TaskListServer {
    /// Storage client, injected once at startup.
    repo: Arc<dyn TaskRepository>,
    renderer: Arc<PageRenderer>,
    page_title: Arc<str>,
}

impl TaskListServer {
    /// Create a new server state instance.
    pub fn new(
        repo: Arc<dyn TaskRepository>,
        renderer: Arc<PageRenderer>,
        page_title: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            repo,
            renderer,
            page_title: page_title.into(),
        }
    }

    pub fn repo(&self) -> &dyn TaskRepository {
        self.repo.as_ref()
    }

    pub fn renderer(&self) -> &PageRenderer {
        &self.renderer
    }

    pub fn page_title(&self) -> &str {
        &self.page_title
    }
}

/// Form data for `/add`.
#[derive(Debug, Deserialize)]
struct AddForm {
    title: Option<String>,
    description: Option<String>,
}

/// Form data for routes that only carry a task id.
#[derive(Debug, Deserialize)]
struct IdForm {
    id: Option<String>,
}

/// Form data for `/edit`.
#[derive(Debug, Deserialize)]
struct EditForm {
    id: Option<String>,
    #[serde(rename = "newText")]
    new_text: Option<String>,
}

/// Unwrap a form extraction, reporting a malformed body as a client error.
fn form_body<T>(form: Result<Form<T>, FormRejection>) -> WebResult<T> {
    form.map(|Form(body)| body)
        .map_err(|rejection| WebError::invalid_value("form", rejection.body_text()))
}

/// Parse the `id` form field as an integer.
fn parse_id(raw: Option<&str>) -> WebResult<TaskId> {
    let raw = raw
        .filter(|s| !s.is_empty())
        .ok_or_else(|| WebError::missing_field("id"))?;
    raw.parse()
        .map_err(|_| WebError::invalid_value("id", format!("{:?} is not an integer", raw)))
}

/// Require a non-blank text field.
fn require_text<'a>(field: &str, value: Option<&'a str>) -> WebResult<&'a str> {
    value
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| WebError::missing_field(field))
}

/// Index page - lists every task.
async fn index(State(state): State<TaskListServer>) -> WebResult<Html<String>> {
    let tasks = state.repo().list_all().await?;
    let html = state
        .renderer()
        .render(state.page_title(), &tasks)
        .map_err(WebError::internal)?;
    Ok(Html(html))
}

/// Handle task creation.
async fn add_task(
    State(state): State<TaskListServer>,
    form: Result<Form<AddForm>, FormRejection>,
) -> WebResult<Redirect> {
    let form = form_body(form)?;
    let title = require_text("title", form.title.as_deref())?;
    let description = form.description.as_deref().unwrap_or_default();

    state.repo().create(title, description).await?;
    Ok(Redirect::to("/"))
}

/// Handle task deletion.
async fn delete_task(
    State(state): State<TaskListServer>,
    form: Result<Form<IdForm>, FormRejection>,
) -> WebResult<Redirect> {
    let form = form_body(form)?;
    let id = parse_id(form.id.as_deref())?;

    state.repo().delete(id).await?;
    Ok(Redirect::to("/"))
}

/// Handle task title edits.
async fn edit_task(
    State(state): State<TaskListServer>,
    form: Result<Form<EditForm>, FormRejection>,
) -> WebResult<Redirect> {
    let form = form_body(form)?;
    let id = parse_id(form.id.as_deref())?;
    let new_title = form.new_text.unwrap_or_default();

    state.repo().update_title(id, &new_title).await?;
    Ok(Redirect::to("/"))
}

/// Handle archive and unarchive; both flip the stored flag.
async fn toggle_archive(
    State(state): State<TaskListServer>,
    form: Result<Form<IdForm>, FormRejection>,
) -> WebResult<Redirect> {
    let form = form_body(form)?;
    let id = parse_id(form.id.as_deref())?;

    state.repo().toggle_archive(id).await?;
    Ok(Redirect::to("/"))
}

/// Build the router with all routes.
pub fn build_router(state: TaskListServer) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/add", post(add_task))
        .route("/delete", post(delete_task))
        .route("/edit", post(edit_task))
        .route("/archive", post(toggle_archive))
        .route("/unarchive", post(toggle_archive))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle for managing the server lifecycle.
pub struct ServerHandle {
    /// Channel to signal shutdown.
    shutdown_tx: oneshot::Sender<()>,
    addr: SocketAddr,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// The address the server is bound to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for in-flight requests to finish.
    ///
    /// Once this returns, the router and its state have been dropped.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.task.await {
            tracing::error!("Server task failed: {}", e);
        }
    }
}

/// Start the HTTP server on the specified address.
///
/// Binding port 0 picks a free port; [`ServerHandle::addr`] reports it.
pub async fn start_server(state: TaskListServer, addr: SocketAddr) -> anyhow::Result<ServerHandle> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    info!("Task list server listening on http://{}", bound_addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Task list server shutting down");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(ServerHandle {
        shutdown_tx,
        addr: bound_addr,
        task,
    })
}
