//! Languages API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::language::{Language, LanguageInput},
    AppState,
};

use super::{AuthenticatedUser, ListQuery, PaginatedResponse};

/// List languages
#[utoipa::path(
    get,
    path = "/languages",
    tag = "languages",
    security(("bearer_auth" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Languages list", body = PaginatedResponse<Language>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_languages(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PaginatedResponse<Language>>> {
    claims.require_staff()?;
    let per_page = state.config.admin.list_per_page;
    let (languages, total) = state
        .services
        .catalog
        .list_languages(query.window(per_page)?)
        .await?;
    Ok(Json(PaginatedResponse::new(languages, total, &query, per_page)))
}

/// Get language by ID
#[utoipa::path(
    get,
    path = "/languages/{id}",
    tag = "languages",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Language ID")),
    responses(
        (status = 200, description = "Language details", body = Language),
        (status = 404, description = "Language not found")
    )
)]
pub async fn get_language(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Language>> {
    claims.require_staff()?;
    let language = state.services.catalog.get_language(id).await?;
    Ok(Json(language))
}

/// Create a language
#[utoipa::path(
    post,
    path = "/languages",
    tag = "languages",
    security(("bearer_auth" = [])),
    request_body = LanguageInput,
    responses(
        (status = 201, description = "Language created", body = Language),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_language(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<LanguageInput>,
) -> AppResult<(StatusCode, Json<Language>)> {
    claims.require_staff()?;
    data.validate()?;
    let language = state.services.catalog.create_language(&data).await?;
    Ok((StatusCode::CREATED, Json(language)))
}

/// Update a language
#[utoipa::path(
    put,
    path = "/languages/{id}",
    tag = "languages",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Language ID")),
    request_body = LanguageInput,
    responses(
        (status = 200, description = "Language updated", body = Language),
        (status = 404, description = "Language not found")
    )
)]
pub async fn update_language(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<LanguageInput>,
) -> AppResult<Json<Language>> {
    claims.require_staff()?;
    data.validate()?;
    let language = state.services.catalog.update_language(id, &data).await?;
    Ok(Json(language))
}

/// Delete a language; its books are kept without one
#[utoipa::path(
    delete,
    path = "/languages/{id}",
    tag = "languages",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Language ID")),
    responses(
        (status = 204, description = "Language deleted"),
        (status = 404, description = "Language not found")
    )
)]
pub async fn delete_language(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_staff()?;
    state.services.catalog.delete_language(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
