//! Admin presentation endpoints

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    admin::{
        render::{ChangeView, ListView},
        site::SiteIndex,
        ModelKind,
    },
    error::AppResult,
    AppState,
};

use super::AuthenticatedUser;

/// Admin site index
#[utoipa::path(
    get,
    path = "/admin",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Registered models", body = SiteIndex),
        (status = 403, description = "Staff account required")
    )
)]
pub async fn site_index(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<SiteIndex>> {
    claims.require_staff()?;
    Ok(Json(state.services.admin.index()))
}

/// Rendered change list of a model
#[utoipa::path(
    get,
    path = "/admin/{model}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("model" = String, Path, description = "Model name, e.g. bookinstance"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("status" = Option<String>, Query, description = "Loan status code (book instances)"),
        ("due_back" = Option<String>, Query, description = "today, past_7_days, this_month, this_year, no_date or has_date")
    ),
    responses(
        (status = 200, description = "List view", body = ListView),
        (status = 400, description = "Invalid filter or page", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown model")
    )
)]
pub async fn list_view(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(model): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<ListView>> {
    claims.require_staff()?;
    let model: ModelKind = model.parse()?;
    let view = state.services.admin.list_view(model, &params).await?;
    Ok(Json(view))
}

/// Rendered change form of a record
#[utoipa::path(
    get,
    path = "/admin/{model}/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("model" = String, Path, description = "Model name, e.g. book"),
        ("id" = String, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Change view", body = ChangeView),
        (status = 404, description = "Unknown model or record")
    )
)]
pub async fn change_view(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((model, id)): Path<(String, String)>,
) -> AppResult<Json<ChangeView>> {
    claims.require_staff()?;
    let model: ModelKind = model.parse()?;
    let view = state.services.admin.change_view(model, &id).await?;
    Ok(Json(view))
}
