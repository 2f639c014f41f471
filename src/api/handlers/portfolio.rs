use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use super::{parse_id, workflow_error};
use crate::api::response::{ApiError, JSend};
use crate::storage::models::{Portfolio, PortfolioSummary};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct PortfolioDetail {
    #[serde(flatten)]
    pub portfolio: Portfolio,
    /// Thumbnail first, then the gallery images
    pub gallery: Vec<String>,
}

/// Route: GET /api/portfolio
///
/// Responds with a bare JSON array for the site frontend. Failures still use
/// the JSend error envelope with a 500.
pub async fn list_portfolio(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PortfolioSummary>>, ApiError> {
    let summaries = state.portfolios.summaries().await.map_err(workflow_error)?;
    Ok(Json(summaries))
}

/// Route: GET /api/portfolio/:id
pub async fn get_portfolio(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JSend<PortfolioDetail>>, ApiError> {
    let id = parse_id(&id)?;
    let portfolio = state.portfolios.get(id).await.map_err(workflow_error)?;

    Ok(JSend::success(PortfolioDetail {
        gallery: portfolio.gallery(),
        portfolio,
    }))
}
