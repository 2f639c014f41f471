use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{multipart_error, parse_id, read_text, read_upload, workflow_error};
use crate::api::response::{ApiError, AppJson, AppQuery, JSend, JSendPaginated, Pagination};
use crate::api::AdminSession;
use crate::auth::{AuthError, Session};
use crate::storage::models::{Portfolio, ProjectLinks, TimeToDevelop};
use crate::workflow::{CreateForm, PortfolioEdit};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ListPortfoliosParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    50
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub urls: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn health() -> Json<JSend<HealthResponse>> {
    JSend::success(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<JSend<Session>>, ApiError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("email and password are required"));
    }

    let session = state
        .auth
        .sign_in(req.email.trim(), &req.password)
        .await
        .map_err(|e| match e {
            AuthError::Backend(msg) => {
                tracing::error!(error = %msg, "Sign-in failed");
                ApiError::unavailable("Authentication service unavailable")
            }
            other => ApiError::unauthorized(other.to_string()),
        })?;

    if !state.config.auth.allows(session.user.email.as_deref()) {
        return Err(ApiError::forbidden("Not an admin account"));
    }

    tracing::info!(user_id = %session.user.id, "Admin signed in");
    Ok(JSend::success(session))
}

pub async fn list_portfolios(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    AppQuery(params): AppQuery<ListPortfoliosParams>,
) -> Result<Json<JSendPaginated<Portfolio>>, ApiError> {
    if params.limit == 0 {
        return Err(ApiError::bad_request("limit must be greater than 0"));
    }

    let rows = state.portfolios.list().await.map_err(workflow_error)?;
    let total = rows.len() as u64;
    let items: Vec<Portfolio> = rows
        .into_iter()
        .skip(params.offset as usize)
        .take(params.limit as usize)
        .collect();

    Ok(JSendPaginated::success(
        items,
        Pagination {
            limit: params.limit,
            offset: params.offset,
            total,
        },
    ))
}

pub async fn create_portfolio(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    mut multipart: Multipart,
) -> Result<Json<JSend<Portfolio>>, ApiError> {
    let max_size = state.config.uploads.max_upload_size;
    let mut form = CreateForm::default();
    let mut links = ProjectLinks::default();
    let mut stack: Vec<String> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "thumbnail" => {
                if let Some(upload) = read_upload(field, max_size).await? {
                    form.thumbnail = Some(upload);
                }
            }
            "images" => {
                if let Some(upload) = read_upload(field, max_size).await? {
                    form.images.push(upload);
                }
            }
            "title" => form.fields.title = read_text(field, "title").await?,
            "rank" => form.fields.rank = Some(read_text(field, "rank").await?),
            "description" => {
                form.fields.description = Some(read_text(field, "description").await?)
            }
            "time_to_develop" => {
                let text = read_text(field, "time_to_develop").await?;
                form.fields.time_to_develop = TimeToDevelop::parse(&text);
            }
            "url_frontend" => links.frontend = Some(read_text(field, "url_frontend").await?),
            "url_backend" => links.backend = Some(read_text(field, "url_backend").await?),
            "url_monolith" => links.monolith = Some(read_text(field, "url_monolith").await?),
            "url_live" => links.live = Some(read_text(field, "url_live").await?),
            "stack" => {
                let text = read_text(field, "stack").await?;
                stack.extend(parse_stack(&text)?);
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    form.fields.urls = Some(links);
    form.fields.stack = Some(dedupe(stack));

    let record = state
        .portfolios
        .create(form)
        .await
        .map_err(workflow_error)?;

    Ok(JSend::success(record))
}

pub async fn load_portfolio(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<JSend<Portfolio>>, ApiError> {
    let id = parse_id(&id)?;
    let record = state.portfolios.get(id).await.map_err(workflow_error)?;
    Ok(JSend::success(record))
}

pub async fn update_portfolio(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Path(id): Path<String>,
    AppJson(edit): AppJson<PortfolioEdit>,
) -> Result<Json<JSend<Portfolio>>, ApiError> {
    let id = parse_id(&id)?;
    let record = state
        .portfolios
        .edit(id, edit)
        .await
        .map_err(workflow_error)?;
    Ok(JSend::success(record))
}

pub async fn delete_portfolio(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<JSend<()>>, ApiError> {
    let id = parse_id(&id)?;
    state.portfolios.delete(id).await.map_err(workflow_error)?;
    Ok(JSend::success(()))
}

/// Upload files ahead of an edit. Each `file` part is stored and its public
/// URL returned, in request order.
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    mut multipart: Multipart,
) -> Result<Json<JSend<UploadResponse>>, ApiError> {
    let max_size = state.config.uploads.max_upload_size;
    let mut uploads = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if !matches!(field.name(), Some("file" | "files")) {
            continue;
        }
        if let Some(upload) = read_upload(field, max_size).await? {
            uploads.push(upload);
        }
    }

    if uploads.is_empty() {
        return Err(ApiError::bad_request("at least one file part is required"));
    }

    let urls = state
        .portfolios
        .upload_all(uploads)
        .await
        .map_err(workflow_error)?;

    Ok(JSend::success(UploadResponse { urls }))
}

// ============================================================================
// Helpers
// ============================================================================

/// A `stack` part holds one tag, or a JSON array of tags.
fn parse_stack(text: &str) -> Result<Vec<String>, ApiError> {
    let trimmed = text.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(|e| {
            ApiError::bad_request(format!("stack must be a JSON array of strings: {e}"))
        });
    }
    Ok(vec![trimmed.to_string()])
}

fn dedupe(tags: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}
