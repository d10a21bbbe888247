//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, auth, authors, book_instances, books, genres, health, languages, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LocalLibrary API",
        version = "1.0.0",
        description = "Library catalog administration REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Genres
        genres::list_genres,
        genres::get_genre,
        genres::create_genre,
        genres::update_genre,
        genres::delete_genre,
        // Languages
        languages::list_languages,
        languages::get_language,
        languages::create_language,
        languages::update_language,
        languages::delete_language,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        authors::list_author_books,
        authors::create_author_book,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::list_copies,
        books::create_copy,
        // Book instances
        book_instances::list_book_instances,
        book_instances::get_book_instance,
        book_instances::create_book_instance,
        book_instances::update_book_instance,
        book_instances::delete_book_instance,
        book_instances::mark_returned,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::delete_user,
        // Admin
        admin::site_index,
        admin::list_view,
        admin::change_view,
    ),
    components(
        schemas(
            // Catalog
            crate::models::genre::Genre,
            crate::models::genre::GenreInput,
            crate::models::language::Language,
            crate::models::language::LanguageInput,
            crate::models::author::Author,
            crate::models::author::AuthorInput,
            crate::models::book::Book,
            crate::models::book::BookDetails,
            crate::models::book::BookInput,
            crate::models::book_instance::BookInstance,
            crate::models::book_instance::BookInstanceDetails,
            crate::models::book_instance::BookInstanceInput,
            crate::models::enums::LoanStatus,
            crate::models::enums::Permission,
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            // Admin
            crate::admin::site::SiteIndex,
            crate::admin::site::ModelEntry,
            crate::admin::render::ListView,
            crate::admin::render::ListRow,
            crate::admin::render::Column,
            crate::admin::render::ChangeView,
            crate::admin::render::FieldsetView,
            crate::admin::render::FieldView,
            crate::admin::render::ChoiceView,
            crate::admin::render::InlineView,
            crate::admin::filters::ListFilterView,
            crate::admin::filters::FilterChoice,
            crate::admin::fields::Widget,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "genres", description = "Genre management"),
        (name = "languages", description = "Language management"),
        (name = "authors", description = "Author management"),
        (name = "books", description = "Book management"),
        (name = "book-instances", description = "Copies and returns"),
        (name = "users", description = "User management"),
        (name = "admin", description = "Rendered admin views")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
