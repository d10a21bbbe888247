//! Business logic services

pub mod admin;
pub mod catalog;
pub mod circulation;
pub mod users;

use std::sync::Arc;

use crate::{admin::AdminSite, config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub circulation: circulation::CirculationService,
    pub users: users::UsersService,
    pub admin: admin::AdminService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, site: Arc<AdminSite>) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            circulation: circulation::CirculationService::new(repository.clone()),
            users: users::UsersService::new(repository.clone(), auth_config),
            admin: admin::AdminService::new(repository.clone(), site),
            repository,
        }
    }

    /// Check database connectivity
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        self.repository.ping().await
    }
}
