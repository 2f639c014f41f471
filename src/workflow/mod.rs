//! Admin workflows over the portfolio table and its object bucket.
//!
//! Every operation is a short linear chain of backend round trips. Nothing is
//! retried, and objects uploaded before a failure are left in the bucket.

mod draft;
mod upload;

pub use draft::{PortfolioDraft, PortfolioEdit};
pub use upload::{key_from_url, object_key, Upload};

use std::sync::Arc;

use futures_util::{StreamExt, TryStreamExt};
use thiserror::Error;

use crate::object_store::{ObjectStore, ObjectStoreError};
use crate::storage::models::{Portfolio, PortfolioFields, PortfolioSummary, ValidationError};
use crate::storage::{PortfolioStore, StoreError};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Upload failed: {0}")]
    Upload(#[source] ObjectStoreError),
    #[error("Persistence failed: {0}")]
    Persistence(#[from] StoreError),
    #[error("Portfolio {0} not found")]
    NotFound(i64),
}

/// Form data for a new record. `fields.thumbnail` and `fields.images` are
/// filled in from the uploads.
#[derive(Debug, Default)]
pub struct CreateForm {
    pub fields: PortfolioFields,
    pub thumbnail: Option<Upload>,
    pub images: Vec<Upload>,
}

pub struct PortfolioService {
    objects: Arc<dyn ObjectStore>,
    rows: Arc<dyn PortfolioStore>,
    upload_concurrency: usize,
}

impl PortfolioService {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        rows: Arc<dyn PortfolioStore>,
        upload_concurrency: usize,
    ) -> Self {
        Self {
            objects,
            rows,
            upload_concurrency: upload_concurrency.max(1),
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub async fn summaries(&self) -> Result<Vec<PortfolioSummary>, WorkflowError> {
        Ok(self.rows.list_summaries().await?)
    }

    pub async fn list(&self) -> Result<Vec<Portfolio>, WorkflowError> {
        Ok(self.rows.list().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Portfolio, WorkflowError> {
        self.rows.get(id).await?.ok_or(WorkflowError::NotFound(id))
    }

    // ========================================================================
    // Uploads
    // ========================================================================

    /// Store one file and return its public URL
    pub async fn upload(&self, upload: Upload) -> Result<String, WorkflowError> {
        let key = object_key(&upload.file_name, chrono::Utc::now().timestamp_millis());
        let content_type = upload.mime_type();

        self.objects
            .put(&key, upload.data, &content_type)
            .await
            .map_err(WorkflowError::Upload)?;

        tracing::debug!(key = %key, content_type = %content_type, "Uploaded object");
        Ok(self.objects.public_url(&key))
    }

    /// Store several files, returning URLs in input order. Stops at the first failure.
    pub async fn upload_all(&self, uploads: Vec<Upload>) -> Result<Vec<String>, WorkflowError> {
        futures_util::stream::iter(uploads)
            .map(|upload| self.upload(upload))
            .buffered(self.upload_concurrency)
            .try_collect()
            .await
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Validate, upload the thumbnail then the gallery, and insert one row.
    pub async fn create(&self, form: CreateForm) -> Result<Portfolio, WorkflowError> {
        let mut fields = form.fields.normalized();
        if fields.title.is_empty() {
            return Err(ValidationError::MissingTitle.into());
        }
        let thumbnail = form.thumbnail.ok_or(ValidationError::MissingThumbnail)?;

        fields.thumbnail = self.upload(thumbnail).await?;
        fields.images = Some(self.upload_all(form.images).await?);

        let fields = fields.normalized();
        fields.validate()?;

        let record = self.rows.insert(&fields).await?;
        tracing::debug!(portfolio_id = record.id, title = %record.title, "Created portfolio");
        Ok(record)
    }

    /// Load the record, apply the edit, and write every editable column back.
    pub async fn edit(&self, id: i64, edit: PortfolioEdit) -> Result<Portfolio, WorkflowError> {
        let current = self.get(id).await?;

        let mut draft = PortfolioDraft::load(&current);
        draft.apply(edit);
        let fields = draft.into_fields()?;

        let record = self
            .rows
            .update(id, &fields)
            .await?
            .ok_or(WorkflowError::NotFound(id))?;

        tracing::debug!(portfolio_id = id, "Updated portfolio");
        Ok(record)
    }

    /// Remove the record's objects (best-effort), then the row.
    pub async fn delete(&self, id: i64) -> Result<Portfolio, WorkflowError> {
        let record = self.get(id).await?;

        let image_keys: Vec<String> = record
            .images
            .iter()
            .flatten()
            .filter_map(|url| key_from_url(url))
            .collect();
        if !image_keys.is_empty() {
            if let Err(e) = self.objects.delete_many(&image_keys).await {
                tracing::warn!(portfolio_id = id, error = %e, "Failed to delete some gallery images");
            }
        }

        if let Some(key) = key_from_url(&record.thumbnail) {
            if let Err(e) = self.objects.delete(&key).await {
                tracing::warn!(portfolio_id = id, key = %key, error = %e, "Failed to delete thumbnail");
            }
        }

        if !self.rows.delete(id).await? {
            return Err(WorkflowError::NotFound(id));
        }

        tracing::debug!(portfolio_id = id, "Deleted portfolio");
        Ok(record)
    }
}
