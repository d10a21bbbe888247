//! Books API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book::{BookDetails, BookInput},
        book_instance::{BookInstanceDetails, BookInstanceInput},
    },
    repository::books::BookFilter,
    AppState,
};

use super::{AuthenticatedUser, ListQuery, PaginatedResponse};

/// Query parameters for listing books
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BooksQuery {
    /// Only books by this author
    pub author_id: Option<i32>,
    /// Page number (default: 1)
    pub page: Option<i64>,
    /// Items per page
    pub per_page: Option<i64>,
}

/// List books (by title, then author)
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    params(BooksQuery),
    responses(
        (status = 200, description = "Books list", body = PaginatedResponse<BookDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BooksQuery>,
) -> AppResult<Json<PaginatedResponse<BookDetails>>> {
    claims.require_staff()?;
    let per_page = state.config.admin.list_per_page;
    let list = ListQuery {
        page: query.page,
        per_page: query.per_page,
    };
    let filter = BookFilter {
        author_id: query.author_id,
    };
    let (books, total) = state
        .services
        .catalog
        .list_books(&filter, list.window(per_page)?)
        .await?;
    Ok(Json(PaginatedResponse::new(books, total, &list, per_page)))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetails>> {
    claims.require_staff()?;
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = BookDetails),
        (status = 400, description = "Invalid input or ISBN already used", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<BookInput>,
) -> AppResult<(StatusCode, Json<BookDetails>)> {
    claims.require_staff()?;
    data.validate()?;
    let book = state.services.catalog.create_book(data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = BookDetails),
        (status = 400, description = "Invalid input or ISBN already used", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<BookInput>,
) -> AppResult<Json<BookDetails>> {
    claims.require_staff()?;
    data.validate()?;
    let book = state.services.catalog.update_book(id, data).await?;
    Ok(Json(book))
}

/// Delete a book (refused while copies exist)
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book instances still reference the book", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_staff()?;
    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List copies of a book
#[utoipa::path(
    get,
    path = "/books/{id}/instances",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Copies of the book", body = Vec<BookInstanceDetails>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_copies(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<BookInstanceDetails>>> {
    claims.require_staff()?;
    let instances = state.services.circulation.for_book(id).await?;
    Ok(Json(instances.into_iter().map(Into::into).collect()))
}

/// Add a copy of a book
#[utoipa::path(
    post,
    path = "/books/{id}/instances",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookInstanceInput,
    responses(
        (status = 201, description = "Copy created", body = BookInstanceDetails),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_copy(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<BookInstanceInput>,
) -> AppResult<(StatusCode, Json<BookInstanceDetails>)> {
    claims.require_staff()?;
    data.validate()?;
    let instance = state.services.circulation.create_for_book(id, data).await?;
    Ok((StatusCode::CREATED, Json(instance.into())))
}
