mod local;
mod supabase;

pub use local::LocalStore;
pub use supabase::SupabaseStorage;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Object not found: {0}")]
    NotFound(String),
    #[error("Invalid object key: {0}")]
    InvalidKey(String),
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Abstraction over a single bucket of publicly readable objects.
/// Keys are single path segments; the public URL ends with the key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), ObjectStoreError>;
    async fn get(&self, key: &str) -> Result<Bytes, ObjectStoreError>;

    /// Deleting a missing object is not an error.
    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError>;

    /// Delete several objects. Every key is attempted; the first failure is returned.
    async fn delete_many(&self, keys: &[String]) -> Result<(), ObjectStoreError> {
        let mut first_error = None;
        for key in keys {
            if let Err(e) = self.delete(key).await {
                tracing::debug!(key = %key, error = %e, "Object delete failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn public_url(&self, key: &str) -> String;
}
