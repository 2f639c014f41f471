mod admin;
mod media;
mod portfolio;

use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;

use crate::api::response::ApiError;
use crate::object_store::ObjectStoreError;
use crate::workflow::{Upload, WorkflowError};

pub use admin::{
    create_portfolio, delete_portfolio, health, list_portfolios, load_portfolio, login,
    update_portfolio, upload_files,
};
pub use media::serve_media;
pub use portfolio::{get_portfolio, list_portfolio};

/// Map a WorkflowError to an ApiError
fn workflow_error(e: WorkflowError) -> ApiError {
    match e {
        WorkflowError::Validation(e) => ApiError::bad_request(e.to_string()),
        WorkflowError::NotFound(_) => ApiError::not_found("Portfolio not found"),
        WorkflowError::Upload(ObjectStoreError::InvalidKey(key)) => {
            ApiError::bad_request(format!("Invalid file name: {key}"))
        }
        WorkflowError::Upload(_) | WorkflowError::Persistence(_) => {
            tracing::error!(error = %e, "Portfolio operation failed");
            ApiError::internal(e.to_string())
        }
    }
}

/// Record ids arrive as path text; reject anything that is not an integer.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid portfolio id: '{raw}'")))
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(e.body_text())
    } else {
        ApiError::bad_request(format!("Invalid multipart data: {}", e.body_text()))
    }
}

/// Read a file part. Browsers send an empty, unnamed part for a file input
/// left blank; that comes back as `None`.
async fn read_upload(field: Field<'_>, max_size: u64) -> Result<Option<Upload>, ApiError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(|s| s.to_string());

    let data: Bytes = field.bytes().await.map_err(multipart_error)?;

    if data.is_empty() && file_name.is_empty() {
        return Ok(None);
    }
    if data.len() as u64 > max_size {
        return Err(ApiError::payload_too_large(format!(
            "File exceeds maximum upload size of {max_size} bytes"
        )));
    }

    Ok(Some(Upload {
        file_name,
        content_type,
        data,
    }))
}

async fn read_text(field: Field<'_>, name: &str) -> Result<String, ApiError> {
    field.text().await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large(e.body_text())
        } else {
            ApiError::bad_request(format!("Invalid {name}: {}", e.body_text()))
        }
    })
}
