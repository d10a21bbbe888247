//! LocalLibrary catalog server
//!
//! Catalog models for books, authors, genres, languages and loanable copies,
//! with an admin presentation layer served as a REST JSON API.

use std::sync::Arc;

pub mod admin;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use routes::create_router;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build the admin site and services over a database pool
    pub fn new(config: AppConfig, pool: sqlx::PgPool) -> Self {
        let site = Arc::new(admin::AdminSite::catalog(config.admin.list_per_page));
        let repository = repository::Repository::new(pool);
        let services = services::Services::new(repository, config.auth.clone(), site);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
