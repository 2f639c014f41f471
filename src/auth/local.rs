use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use ring::hmac;
use tokio::sync::RwLock;

use super::{AdminUser, AuthError, Authenticator, Session};

/// Single-admin authenticator for the local backend.
///
/// The password is kept only as an HMAC tag under a per-process random key, so
/// verification is a constant-time tag comparison. Sessions live in memory and
/// are lost on restart.
pub struct LocalAuthenticator {
    email: String,
    password_key: hmac::Key,
    password_tag: hmac::Tag,
    ttl: Duration,
    sessions: RwLock<HashMap<String, (AdminUser, DateTime<Utc>)>>,
}

impl LocalAuthenticator {
    pub fn new(email: &str, password: &str, ttl_secs: u64) -> Result<Self, anyhow::Error> {
        let rng = ring::rand::SystemRandom::new();
        let password_key = hmac::Key::generate(hmac::HMAC_SHA256, &rng)
            .map_err(|_| anyhow::anyhow!("Failed to generate session key"))?;
        let password_tag = hmac::sign(&password_key, password.as_bytes());
        // capped at a year
        let ttl = Duration::seconds(ttl_secs.min(365 * 24 * 3600) as i64);

        Ok(Self {
            email: email.trim().to_string(),
            password_key,
            password_tag,
            ttl,
            sessions: RwLock::new(HashMap::new()),
        })
    }

    fn user(&self) -> AdminUser {
        AdminUser {
            id: "local-admin".to_string(),
            email: Some(self.email.clone()),
        }
    }
}

#[async_trait]
impl Authenticator for LocalAuthenticator {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let password_ok =
            hmac::verify(&self.password_key, password.as_bytes(), self.password_tag.as_ref())
                .is_ok();
        if !password_ok || !email.trim().eq_ignore_ascii_case(&self.email) {
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = uuid::Uuid::new_v4().simple().to_string();
        let user = self.user();
        let now = Utc::now();

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, (_, expires_at)| *expires_at > now);
        sessions.insert(access_token.clone(), (user.clone(), now + self.ttl));

        Ok(Session {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: self.ttl.num_seconds().max(0) as u64,
            user,
        })
    }

    async fn verify(&self, access_token: &str) -> Result<AdminUser, AuthError> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(access_token) {
                Some((user, expires_at)) if *expires_at > now => return Ok(user.clone()),
                Some(_) => {}
                None => return Err(AuthError::InvalidToken),
            }
        }

        // Expired: forget it
        self.sessions.write().await.remove(access_token);
        Err(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_and_verify() {
        let auth = LocalAuthenticator::new("admin@example.com", "correct horse", 60).unwrap();

        let session = auth
            .sign_in("Admin@Example.com", "correct horse")
            .await
            .unwrap();
        assert_eq!(session.token_type, "bearer");
        assert_eq!(session.expires_in, 60);

        let user = auth.verify(&session.access_token).await.unwrap();
        assert_eq!(user.email.as_deref(), Some("admin@example.com"));
    }

    #[tokio::test]
    async fn test_rejects_wrong_credentials() {
        let auth = LocalAuthenticator::new("admin@example.com", "correct horse", 60).unwrap();

        assert!(matches!(
            auth.sign_in("admin@example.com", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.sign_in("someone@example.com", "correct horse").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_rejects_unknown_and_expired_tokens() {
        let auth = LocalAuthenticator::new("admin@example.com", "pw", 0).unwrap();

        assert!(matches!(
            auth.verify("nope").await,
            Err(AuthError::InvalidToken)
        ));

        let session = auth.sign_in("admin@example.com", "pw").await.unwrap();
        assert!(matches!(
            auth.verify(&session.access_token).await,
            Err(AuthError::InvalidToken)
        ));
    }
}
