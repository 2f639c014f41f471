use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;

use super::{ObjectStore, ObjectStoreError};
use crate::supabase::{failure_message, SupabaseClient};

/// Supabase Storage bucket backend.
pub struct SupabaseStorage {
    client: SupabaseClient,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(client: SupabaseClient, bucket: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
        }
    }

    fn object_path(&self, key: &str) -> String {
        format!("storage/v1/object/{}/{key}", self.bucket)
    }
}

#[async_trait]
impl ObjectStore for SupabaseStorage {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), ObjectStoreError> {
        let resp = self
            .client
            .request(Method::POST, &self.object_path(key))
            .header("Content-Type", content_type)
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await
            .map_err(|e| ObjectStoreError::Backend(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ObjectStoreError::Backend(
                failure_message("Supabase upload", resp).await,
            ));
        }

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, ObjectStoreError> {
        let resp = self
            .client
            .request(Method::GET, &self.object_path(key))
            .send()
            .await
            .map_err(|e| ObjectStoreError::Backend(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ObjectStoreError::NotFound(key.to_string()));
        }

        if !resp.status().is_success() {
            return Err(ObjectStoreError::Backend(
                failure_message("Supabase download", resp).await,
            ));
        }

        resp.bytes()
            .await
            .map_err(|e| ObjectStoreError::Backend(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError> {
        self.delete_many(&[key.to_string()]).await
    }

    /// One batch request; Storage skips keys that do not exist.
    async fn delete_many(&self, keys: &[String]) -> Result<(), ObjectStoreError> {
        if keys.is_empty() {
            return Ok(());
        }

        let resp = self
            .client
            .request(Method::DELETE, &format!("storage/v1/object/{}", self.bucket))
            .json(&serde_json::json!({ "prefixes": keys }))
            .send()
            .await
            .map_err(|e| ObjectStoreError::Backend(e.to_string()))?;

        if !resp.status().is_success() && resp.status() != reqwest::StatusCode::NOT_FOUND {
            return Err(ObjectStoreError::Backend(
                failure_message("Supabase delete", resp).await,
            ));
        }

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        self.client
            .url(&format!("storage/v1/object/public/{}/{key}", self.bucket))
    }
}
