use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::api::response::ApiError;
use crate::object_store::ObjectStoreError;
use crate::AppState;

/// Stream a locally stored object.
/// Route: GET /media/*key
pub async fn serve_media(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    let store = state
        .media
        .as_ref()
        .ok_or_else(|| ApiError::not_found("Media is not served by this backend"))?;

    let file = store.open(&key).await.map_err(|e| match e {
        ObjectStoreError::NotFound(_) | ObjectStoreError::InvalidKey(_) => {
            ApiError::not_found("File not found")
        }
        _ => ApiError::internal(format!("Failed to read file: {e}")),
    })?;

    let byte_size = file.metadata().await.ok().map(|m| m.len());
    let mime_type = mime_guess::from_path(&key).first_or_octet_stream();

    let body = Body::from_stream(ReaderStream::new(file));
    let mut response = (StatusCode::OK, body).into_response();
    let headers = response.headers_mut();

    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_str(mime_type.essence_str())
            .unwrap_or(header::HeaderValue::from_static("application/octet-stream")),
    );

    if let Some(len) = byte_size {
        headers.insert(header::CONTENT_LENGTH, header::HeaderValue::from(len));
    }

    // Keys embed the upload time, so content behind a key never changes
    headers.insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("public, max-age=31536000, immutable"),
    );

    Ok(response)
}
