use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portfolio_site::{
    api,
    auth::{Authenticator, LocalAuthenticator, SupabaseAuthenticator},
    config::{Backend, Config},
    object_store as obj,
    storage::{Database, PortfolioStore, PostgrestTable},
    supabase::SupabaseClient,
    workflow::PortfolioService,
    AppState,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    match log_format.to_lowercase().as_str() {
        "gcp" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_stackdriver::layer())
                .init();
        }
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_span_list(false),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    info!(version = env!("CARGO_PKG_VERSION"), "portfolio-site starting");

    let config = Config::load()?;
    let state = Arc::new(build_state(config).await?);

    let app = api::create_router(Arc::clone(&state));
    let listener = tokio::net::TcpListener::bind(&state.config.server.bind_address).await?;
    info!("Listening on: {}", state.config.server.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn build_state(config: Config) -> anyhow::Result<AppState> {
    let concurrency = config.uploads.concurrency;

    match config.backend {
        Backend::Local => {
            let db = Database::open(&config.local.data_dir)?;
            info!("Database opened at: {}", config.local.data_dir);

            let media = Arc::new(obj::LocalStore::new(
                &config.local.storage_path,
                &config.server.public_base_url,
            )?);
            info!(
                "Using local storage backend at: {}",
                config.local.storage_path
            );

            // Both are required by config validation for this backend
            let email = config.local.admin_email.as_deref().unwrap_or_default();
            let password = config.local.admin_password.as_deref().unwrap_or_default();
            let auth: Arc<dyn Authenticator> = Arc::new(LocalAuthenticator::new(
                email,
                password,
                config.local.session_ttl_secs,
            )?);

            let objects: Arc<dyn obj::ObjectStore> = media.clone();
            let rows: Arc<dyn PortfolioStore> = Arc::new(db);

            Ok(AppState {
                portfolios: PortfolioService::new(objects, rows, concurrency),
                auth,
                media: Some(media),
                config,
            })
        }
        Backend::Supabase => {
            let client = SupabaseClient::new(&config.supabase)?;
            if config.supabase.service_key.is_none() {
                tracing::warn!("SUPABASE_SERVICE_KEY not set, writes use the anon key");
            }
            info!(
                table = %config.supabase.table,
                bucket = %config.supabase.bucket,
                "Using Supabase backend"
            );

            let objects: Arc<dyn obj::ObjectStore> = Arc::new(obj::SupabaseStorage::new(
                client.clone(),
                &config.supabase.bucket,
            ));
            let rows: Arc<dyn PortfolioStore> =
                Arc::new(PostgrestTable::new(client.clone(), &config.supabase.table));
            let auth: Arc<dyn Authenticator> = Arc::new(SupabaseAuthenticator::new(client));

            Ok(AppState {
                portfolios: PortfolioService::new(objects, rows, concurrency),
                auth,
                media: None,
                config,
            })
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
