//! HTTP API over a shared [`Workspace`].
//!
//! ```text
//! GET   /api/sites                  list the caller's sites
//! POST  /api/sites                  create a site
//! GET   /api/sites/:id              fetch a site
//! PATCH /api/sites/:id              patch a site
//! GET   /api/sites/:id/pages        list a site's pages
//! POST  /api/sites/:id/pages        create a page
//! GET   /api/pages/:id              fetch a page
//! PATCH /api/pages/:id              patch a page (the editor's save)
//! POST  /api/pages/:id/publish      render and publish a page
//! ```
//!
//! The caller is identified by the `x-account-id` header, falling back to
//! the configured default account. Errors are JSON objects with an
//! `error` field.

use crate::models::{CreatePage, CreateSite, PagePatch, SitePatch};
use crate::workspace::{Workspace, WorkspaceError};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

pub const ACCOUNT_HEADER: &str = "x-account-id";

#[derive(Clone)]
pub struct AppState {
    workspace: Arc<RwLock<Workspace>>,
    default_account_id: Arc<str>,
}

impl AppState {
    pub fn new(workspace: Arc<RwLock<Workspace>>, default_account_id: impl Into<String>) -> Self {
        Self {
            workspace,
            default_account_id: Arc::from(default_account_id.into()),
        }
    }

    pub fn workspace(&self) -> &Arc<RwLock<Workspace>> {
        &self.workspace
    }

    fn account_id(&self, headers: &HeaderMap) -> String {
        headers
            .get(ACCOUNT_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(&self.default_account_id)
            .to_string()
    }
}

#[derive(Debug)]
pub enum ApiError {
    Workspace(WorkspaceError),
    BadRequest(String),
}

impl From<WorkspaceError> for ApiError {
    fn from(error: WorkspaceError) -> Self {
        ApiError::Workspace(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Workspace(WorkspaceError::SiteNotFound(_))
            | ApiError::Workspace(WorkspaceError::PageNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Workspace(WorkspaceError::InvalidDocument(_)) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Workspace(WorkspaceError::Publish(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = match self {
            ApiError::Workspace(e) => e.to_string(),
            ApiError::BadRequest(message) => message,
        };

        if status.is_server_error() {
            tracing::error!(%status, error = %message, "request failed");
        } else {
            tracing::debug!(%status, error = %message, "request rejected");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/sites", get(list_sites).post(create_site))
        .route("/api/sites/:site_id", get(get_site).patch(update_site))
        .route(
            "/api/sites/:site_id/pages",
            get(list_pages).post(create_page),
        )
        .route("/api/pages/:page_id", get(get_page).patch(update_page))
        .route("/api/pages/:page_id/publish", post(publish_page))
        .fallback(not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Parse a JSON request body; an empty body means `{}`
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> ApiResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}

async fn list_sites(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let account_id = state.account_id(&headers);
    let workspace = state.workspace.read().await;
    Json(workspace.list_sites(&account_id))
}

async fn create_site(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let account_id = state.account_id(&headers);
    let data: CreateSite = parse_body(&body)?;
    let mut workspace = state.workspace.write().await;
    Ok((StatusCode::CREATED, Json(workspace.create_site(&account_id, data))))
}

async fn get_site(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(site_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let account_id = state.account_id(&headers);
    let workspace = state.workspace.read().await;
    Ok(Json(workspace.get_site(&account_id, &site_id)?))
}

async fn update_site(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(site_id): Path<String>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let account_id = state.account_id(&headers);
    let patch: SitePatch = parse_body(&body)?;
    let mut workspace = state.workspace.write().await;
    Ok(Json(workspace.update_site(&account_id, &site_id, patch)?))
}

async fn list_pages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(site_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let account_id = state.account_id(&headers);
    let workspace = state.workspace.read().await;
    Ok(Json(workspace.list_pages(&account_id, &site_id)?))
}

async fn create_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(site_id): Path<String>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let account_id = state.account_id(&headers);
    let data: CreatePage = parse_body(&body)?;
    let mut workspace = state.workspace.write().await;
    let page = workspace.create_page(&account_id, &site_id, data)?;
    Ok((StatusCode::CREATED, Json(page)))
}

async fn get_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(page_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let account_id = state.account_id(&headers);
    let workspace = state.workspace.read().await;
    Ok(Json(workspace.get_page(&account_id, &page_id)?))
}

async fn update_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(page_id): Path<String>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let account_id = state.account_id(&headers);
    let patch: PagePatch = parse_body(&body)?;
    let mut workspace = state.workspace.write().await;
    Ok(Json(workspace.update_page(&account_id, &page_id, patch)?))
}

async fn publish_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(page_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let account_id = state.account_id(&headers);
    let mut workspace = state.workspace.write().await;
    Ok(Json(workspace.publish_page(&account_id, &page_id)?))
}

async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not found",
            "path": uri.path(),
            "method": method.as_str(),
        })),
    )
}
