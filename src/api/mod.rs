//! API handlers for LocalLibrary REST endpoints

pub mod admin;
pub mod auth;
pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod health;
pub mod languages;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, AppResult},
    models::user::UserClaims,
    repository::Page,
    AppState,
};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Pagination query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListQuery {
    /// Page number (default: 1)
    pub page: Option<i64>,
    /// Items per page (default: the admin list page size)
    pub per_page: Option<i64>,
}

impl ListQuery {
    /// Resolved (page, per_page) with defaults applied
    pub fn resolve(&self, default_per_page: i64) -> (i64, i64) {
        (
            self.page.unwrap_or(1).max(1),
            self.per_page.unwrap_or(default_per_page).clamp(1, 1000),
        )
    }

    pub fn window(&self, default_per_page: i64) -> AppResult<Page> {
        let (page, per_page) = self.resolve(default_per_page);
        Page::number(page, per_page)
    }
}

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// List of items
    pub items: Vec<T>,
    /// Total number of items
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Items per page
    pub per_page: i64,
}

impl<T> PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>, total: i64, query: &ListQuery, default_per_page: i64) -> Self {
        let (page, per_page) = query.resolve(default_per_page);
        Self {
            items,
            total,
            page,
            per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let query = ListQuery::default();
        assert_eq!(query.resolve(100), (1, 100));
        assert_eq!(query.window(100).unwrap(), Page::number(1, 100).unwrap());

        let query = ListQuery {
            page: Some(0),
            per_page: Some(5000),
        };
        assert_eq!(query.resolve(100), (1, 1000));
    }

    #[test]
    fn test_list_query_huge_page() {
        let query = ListQuery {
            page: Some(i64::MAX),
            per_page: None,
        };
        assert!(matches!(query.window(100), Err(AppError::BadRequest(_))));
    }
}
