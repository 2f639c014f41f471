use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let request_limit = state.config.request_limit();

    let mut router = Router::new()
        // Public site
        .route("/api/portfolio", get(handlers::list_portfolio))
        .route("/api/portfolio/:id", get(handlers::get_portfolio))
        // Admin
        .route("/admin/login", post(handlers::login))
        .route("/admin/portfolios", get(handlers::list_portfolios))
        .route(
            "/admin/portfolios",
            post(handlers::create_portfolio).layer(DefaultBodyLimit::max(request_limit)),
        )
        .route("/admin/portfolios/:id", get(handlers::load_portfolio))
        .route("/admin/portfolios/:id", put(handlers::update_portfolio))
        .route("/admin/portfolios/:id", delete(handlers::delete_portfolio))
        .route(
            "/admin/uploads",
            post(handlers::upload_files).layer(DefaultBodyLimit::max(request_limit)),
        )
        // Internal
        .route("/_internal/health", get(handlers::health));

    // Objects are only served from here when they live on local disk
    if state.media.is_some() {
        router = router.route("/media/*key", get(handlers::serve_media));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
