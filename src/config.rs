use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: Backend,
    pub local: LocalConfig,
    pub supabase: SupabaseConfig,
    pub auth: AuthConfig,
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Prefix for public URLs of locally stored objects (served under `/media`)
    pub public_base_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Local,
    Supabase,
}

#[derive(Debug, Clone)]
pub struct LocalConfig {
    pub data_dir: String,
    pub storage_path: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub session_ttl_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    /// Used for row and storage writes when set; otherwise the anon key is used.
    pub service_key: Option<String>,
    pub table: String,
    pub bucket: String,
    pub http_timeout_secs: u64,
}

#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// When non-empty, only these emails may use the admin routes.
    pub admin_emails: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Maximum size of a single uploaded file in bytes
    pub max_upload_size: u64,
    /// Maximum size of a whole multipart request in bytes
    pub max_request_size: u64,
    /// How many gallery uploads may be in flight at once
    pub concurrency: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
        }
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            storage_path: "./files".to_string(),
            admin_email: None,
            admin_password: None,
            session_ttl_secs: 3600,
        }
    }
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            service_key: None,
            table: "portfolio".to_string(),
            bucket: "project-images".to_string(),
            http_timeout_secs: 30,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_size: 10 * 1024 * 1024,   // 10MB
            max_request_size: 100 * 1024 * 1024, // 100MB
            concurrency: 1,
        }
    }
}

impl AuthConfig {
    pub fn allows(&self, email: Option<&str>) -> bool {
        if self.admin_emails.is_empty() {
            return true;
        }
        email.is_some_and(|email| {
            self.admin_emails
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(email))
        })
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse_u64 = |key: &str, default: u64| -> Result<u64, ConfigError> {
            match lookup(key) {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    ConfigError::ValidationError(format!("{key} must be a non-negative integer"))
                }),
                None => Ok(default),
            }
        };

        let server_defaults = ServerConfig::default();
        let local_defaults = LocalConfig::default();
        let supabase_defaults = SupabaseConfig::default();
        let upload_defaults = UploadConfig::default();

        let backend = match lookup("BACKEND")
            .unwrap_or_else(|| "local".to_string())
            .to_lowercase()
            .as_str()
        {
            "local" => Backend::Local,
            "supabase" => Backend::Supabase,
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "BACKEND must be 'local' or 'supabase', got '{other}'"
                )))
            }
        };

        let admin_emails: Vec<String> = lookup("ADMIN_EMAILS")
            .map(|list| {
                list.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let config = Config {
            server: ServerConfig {
                bind_address: lookup("BIND_ADDRESS").unwrap_or(server_defaults.bind_address),
                public_base_url: lookup("PUBLIC_BASE_URL")
                    .unwrap_or(server_defaults.public_base_url)
                    .trim_end_matches('/')
                    .to_string(),
            },
            backend,
            local: LocalConfig {
                data_dir: lookup("DATA_DIR").unwrap_or(local_defaults.data_dir),
                storage_path: lookup("LOCAL_STORAGE_PATH").unwrap_or(local_defaults.storage_path),
                admin_email: lookup("ADMIN_EMAIL"),
                admin_password: lookup("ADMIN_PASSWORD"),
                session_ttl_secs: parse_u64("SESSION_TTL_SECS", local_defaults.session_ttl_secs)?,
            },
            supabase: SupabaseConfig {
                url: lookup("SUPABASE_URL").map(|u| u.trim_end_matches('/').to_string()),
                anon_key: lookup("SUPABASE_ANON_KEY"),
                service_key: lookup("SUPABASE_SERVICE_KEY"),
                table: lookup("PORTFOLIO_TABLE").unwrap_or(supabase_defaults.table),
                bucket: lookup("STORAGE_BUCKET").unwrap_or(supabase_defaults.bucket),
                http_timeout_secs: parse_u64(
                    "HTTP_TIMEOUT_SECS",
                    supabase_defaults.http_timeout_secs,
                )?,
            },
            auth: AuthConfig { admin_emails },
            uploads: UploadConfig {
                max_upload_size: parse_u64("MAX_UPLOAD_SIZE", upload_defaults.max_upload_size)?,
                max_request_size: parse_u64(
                    "MAX_REQUEST_SIZE",
                    upload_defaults.max_request_size,
                )?,
                concurrency: parse_u64("UPLOAD_CONCURRENCY", upload_defaults.concurrency as u64)?
                    as usize,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.uploads.concurrency == 0 {
            return Err(ConfigError::ValidationError(
                "UPLOAD_CONCURRENCY must be at least 1".to_string(),
            ));
        }

        if self.uploads.max_upload_size > self.uploads.max_request_size {
            return Err(ConfigError::ValidationError(
                "MAX_UPLOAD_SIZE cannot exceed MAX_REQUEST_SIZE".to_string(),
            ));
        }

        match self.backend {
            Backend::Local => {
                if self.local.admin_email.is_none() || self.local.admin_password.is_none() {
                    return Err(ConfigError::ValidationError(
                        "ADMIN_EMAIL and ADMIN_PASSWORD are required when BACKEND=local"
                            .to_string(),
                    ));
                }
                if self
                    .local
                    .admin_password
                    .as_deref()
                    .is_some_and(|p| p.len() < 8)
                {
                    tracing::warn!("ADMIN_PASSWORD is shorter than 8 characters");
                }
            }
            Backend::Supabase => {
                let url = self.supabase.url.as_deref().ok_or_else(|| {
                    ConfigError::ValidationError(
                        "SUPABASE_URL is required when BACKEND=supabase".to_string(),
                    )
                })?;
                if !(url.starts_with("https://") || url.starts_with("http://")) {
                    return Err(ConfigError::ValidationError(format!(
                        "SUPABASE_URL must be an http(s) URL, got '{url}'"
                    )));
                }
                if self.supabase.anon_key.is_none() {
                    return Err(ConfigError::ValidationError(
                        "SUPABASE_ANON_KEY is required when BACKEND=supabase".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Request-size ceiling for multipart routes.
    pub fn request_limit(&self) -> usize {
        usize::try_from(self.uploads.max_request_size).unwrap_or(usize::MAX)
    }
}
