//! Admin sign-in and access-token verification.

mod local;
mod supabase;

pub use local::LocalAuthenticator;
pub use supabase::SupabaseAuthenticator;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Invalid or expired access token")]
    InvalidToken,
    #[error("Auth backend error: {0}")]
    Backend(String),
}

/// The signed-in user behind an access token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Issued on successful sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: AdminUser,
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;
    async fn verify(&self, access_token: &str) -> Result<AdminUser, AuthError>;
}
