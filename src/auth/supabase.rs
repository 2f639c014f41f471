use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;

use super::{AdminUser, AuthError, Authenticator, Session};
use crate::supabase::{failure_message, SupabaseClient};

/// Delegates sign-in and token checks to Supabase Auth (GoTrue).
pub struct SupabaseAuthenticator {
    client: SupabaseClient,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default)]
    expires_in: u64,
    user: AdminUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl SupabaseAuthenticator {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Authenticator for SupabaseAuthenticator {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let resp = self
            .client
            .anon_request(Method::POST, "auth/v1/token")
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::Backend(e.to_string()))?;

        match resp.status() {
            s if s.is_success() => {}
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                return Err(AuthError::InvalidCredentials)
            }
            _ => return Err(AuthError::Backend(failure_message("Sign-in", resp).await)),
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| AuthError::Backend(e.to_string()))?;

        Ok(Session {
            access_token: token.access_token,
            token_type: token.token_type,
            expires_in: token.expires_in,
            user: token.user,
        })
    }

    async fn verify(&self, access_token: &str) -> Result<AdminUser, AuthError> {
        let resp = self
            .client
            .anon_request(Method::GET, "auth/v1/user")
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Backend(e.to_string()))?;

        match resp.status() {
            s if s.is_success() => resp
                .json()
                .await
                .map_err(|e| AuthError::Backend(e.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::InvalidToken),
            _ => Err(AuthError::Backend(
                failure_message("Token verification", resp).await,
            )),
        }
    }
}
