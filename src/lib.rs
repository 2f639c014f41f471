//! portfolio-site - Backend for a personal portfolio website and its admin area
//!
//! This crate provides:
//! - Public JSON API listing portfolio projects ordered by rank
//! - Admin API for creating, editing and deleting projects with image uploads
//! - Swappable backends: Supabase (PostgREST, Storage, Auth) or local
//!   (redb rows, filesystem objects, single admin account)

pub mod api;
pub mod auth;
pub mod config;
pub mod object_store;
pub mod storage;
pub mod supabase;
#[cfg(test)]
pub mod testutil;
pub mod workflow;

use std::sync::Arc;

use auth::Authenticator;
use config::Config;
use object_store::LocalStore;
use workflow::PortfolioService;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub auth: Arc<dyn Authenticator>,
    pub portfolios: PortfolioService,
    /// Set for the local backend, whose objects are served under `/media`
    pub media: Option<Arc<LocalStore>>,
}
