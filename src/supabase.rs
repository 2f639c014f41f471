//! Thin HTTP client shared by the Supabase-backed row store, object store and
//! authenticator.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};

use crate::config::SupabaseConfig;

#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: String,
    anon_key: String,
    service_key: Option<String>,
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig) -> Result<Self, anyhow::Error> {
        let base_url = config
            .url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("SUPABASE_URL is not configured"))?;
        let anon_key = config
            .anon_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("SUPABASE_ANON_KEY is not configured"))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            service_key: config.service_key.clone(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Request authorized with the service key when configured, else the anon key.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let key = self.service_key.as_deref().unwrap_or(&self.anon_key);
        self.http
            .request(method, self.url(path))
            .header("apikey", key)
            .bearer_auth(key)
    }

    /// Request carrying only the project's anon key, for the auth endpoints.
    pub fn anon_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("apikey", &self.anon_key)
    }
}

/// Format a non-success response as `"<what> failed (<status>): <body>"`.
pub async fn failure_message(what: &str, resp: Response) -> String {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    format!("{what} failed ({status}): {body}")
}
