//! Shared test helpers for router-level tests.

use std::sync::Arc;

use crate::auth::LocalAuthenticator;
use crate::config::{
    AuthConfig, Backend, Config, LocalConfig, ServerConfig, SupabaseConfig, UploadConfig,
};
use crate::object_store::LocalStore;
use crate::storage::Database;
use crate::workflow::PortfolioService;
use crate::AppState;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct horse battery";

/// Create a local-backend AppState with a temporary database and object store.
pub fn test_state(temp_dir: &tempfile::TempDir) -> Arc<AppState> {
    let data_dir = temp_dir.path().join("data");
    let files_dir = temp_dir.path().join("files");

    let config = Config {
        server: ServerConfig {
            bind_address: "127.0.0.1:0".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
        },
        backend: Backend::Local,
        local: LocalConfig {
            data_dir: data_dir.to_string_lossy().to_string(),
            storage_path: files_dir.to_string_lossy().to_string(),
            admin_email: Some(ADMIN_EMAIL.to_string()),
            admin_password: Some(ADMIN_PASSWORD.to_string()),
            session_ttl_secs: 600,
        },
        supabase: SupabaseConfig::default(),
        auth: AuthConfig::default(),
        uploads: UploadConfig {
            max_upload_size: 1024 * 1024, // 1MB for tests
            ..UploadConfig::default()
        },
    };

    let db = Database::open(&data_dir).expect("Failed to open test database");
    let media = Arc::new(
        LocalStore::new(&files_dir, &config.server.public_base_url)
            .expect("Failed to create test object store"),
    );
    let auth = LocalAuthenticator::new(ADMIN_EMAIL, ADMIN_PASSWORD, 600)
        .expect("Failed to create test authenticator");

    Arc::new(AppState {
        portfolios: PortfolioService::new(media.clone(), Arc::new(db), 2),
        auth: Arc::new(auth),
        media: Some(media),
        config,
    })
}
