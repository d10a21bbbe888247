//! Book instances API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book_instance::{BookInstanceDetails, BookInstanceInput, BookInstanceQuery},
        enums::Permission,
    },
    AppState,
};

use super::{AuthenticatedUser, ListQuery, PaginatedResponse};

/// List copies, soonest due first
#[utoipa::path(
    get,
    path = "/book-instances",
    tag = "book-instances",
    security(("bearer_auth" = [])),
    params(BookInstanceQuery, ListQuery),
    responses(
        (status = 200, description = "Copies list", body = PaginatedResponse<BookInstanceDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_book_instances(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BookInstanceQuery>,
    Query(list): Query<ListQuery>,
) -> AppResult<Json<PaginatedResponse<BookInstanceDetails>>> {
    claims.require_staff()?;
    let per_page = state.config.admin.list_per_page;
    let (instances, total) = state
        .services
        .circulation
        .list(&query, list.window(per_page)?)
        .await?;
    let items = instances.into_iter().map(Into::into).collect();
    Ok(Json(PaginatedResponse::new(items, total, &list, per_page)))
}

/// Get copy by ID
#[utoipa::path(
    get,
    path = "/book-instances/{id}",
    tag = "book-instances",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Copy details", body = BookInstanceDetails),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn get_book_instance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookInstanceDetails>> {
    claims.require_staff()?;
    let instance = state.services.circulation.get(id).await?;
    Ok(Json(instance.into()))
}

/// Register a copy (status defaults to maintenance)
#[utoipa::path(
    post,
    path = "/book-instances",
    tag = "book-instances",
    security(("bearer_auth" = [])),
    request_body = BookInstanceInput,
    responses(
        (status = 201, description = "Copy created", body = BookInstanceDetails),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book_instance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<BookInstanceInput>,
) -> AppResult<(StatusCode, Json<BookInstanceDetails>)> {
    claims.require_staff()?;
    data.validate()?;
    let instance = state.services.circulation.create(&data).await?;
    Ok((StatusCode::CREATED, Json(instance.into())))
}

/// Update a copy
#[utoipa::path(
    put,
    path = "/book-instances/{id}",
    tag = "book-instances",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book instance ID")),
    request_body = BookInstanceInput,
    responses(
        (status = 200, description = "Copy updated", body = BookInstanceDetails),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn update_book_instance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<BookInstanceInput>,
) -> AppResult<Json<BookInstanceDetails>> {
    claims.require_staff()?;
    data.validate()?;
    let instance = state.services.circulation.update(id, &data).await?;
    Ok(Json(instance.into()))
}

/// Delete a copy
#[utoipa::path(
    delete,
    path = "/book-instances/{id}",
    tag = "book-instances",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 204, description = "Copy deleted"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn delete_book_instance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_staff()?;
    state.services.circulation.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark a copy as returned: available, no due date, no borrower
#[utoipa::path(
    post,
    path = "/book-instances/{id}/mark-returned",
    tag = "book-instances",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Copy returned", body = BookInstanceDetails),
        (status = 403, description = "Missing permission to mark returns"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn mark_returned(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookInstanceDetails>> {
    claims.require_perm(Permission::CanMarkReturned)?;
    let instance = state.services.circulation.mark_returned(id).await?;
    Ok(Json(instance.into()))
}
