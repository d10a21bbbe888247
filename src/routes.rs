//! HTTP routing

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{api, AppState};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Genres
        .route(
            "/genres",
            get(api::genres::list_genres).post(api::genres::create_genre),
        )
        .route(
            "/genres/:id",
            get(api::genres::get_genre)
                .put(api::genres::update_genre)
                .delete(api::genres::delete_genre),
        )
        // Languages
        .route(
            "/languages",
            get(api::languages::list_languages).post(api::languages::create_language),
        )
        .route(
            "/languages/:id",
            get(api::languages::get_language)
                .put(api::languages::update_language)
                .delete(api::languages::delete_language),
        )
        // Authors
        .route(
            "/authors",
            get(api::authors::list_authors).post(api::authors::create_author),
        )
        .route(
            "/authors/:id",
            get(api::authors::get_author)
                .put(api::authors::update_author)
                .delete(api::authors::delete_author),
        )
        .route(
            "/authors/:id/books",
            get(api::authors::list_author_books).post(api::authors::create_author_book),
        )
        // Books
        .route(
            "/books",
            get(api::books::list_books).post(api::books::create_book),
        )
        .route(
            "/books/:id",
            get(api::books::get_book)
                .put(api::books::update_book)
                .delete(api::books::delete_book),
        )
        .route(
            "/books/:id/instances",
            get(api::books::list_copies).post(api::books::create_copy),
        )
        // Book instances
        .route(
            "/book-instances",
            get(api::book_instances::list_book_instances)
                .post(api::book_instances::create_book_instance),
        )
        .route(
            "/book-instances/:id",
            get(api::book_instances::get_book_instance)
                .put(api::book_instances::update_book_instance)
                .delete(api::book_instances::delete_book_instance),
        )
        .route(
            "/book-instances/:id/mark-returned",
            post(api::book_instances::mark_returned),
        )
        // Users
        .route(
            "/users",
            get(api::users::list_users).post(api::users::create_user),
        )
        .route(
            "/users/:id",
            get(api::users::get_user).delete(api::users::delete_user),
        )
        // Admin views
        .route("/admin", get(api::admin::site_index))
        .route("/admin/:model", get(api::admin::list_view))
        .route("/admin/:model/:id", get(api::admin::change_view))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
