//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, events, favorites, health, loans};

struct BearerAuth;

impl Modify for BearerAuth {
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

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "1.0.0",
        description = "Library lending REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::delete_book,
        // Loans
        loans::my_loans,
        loans::borrow_book,
        loans::return_book,
        // Favorites
        favorites::my_favorites,
        favorites::add_favorite,
        favorites::remove_favorite,
        // Events
        events::event_stream,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::Credentials,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterResponse,
            auth::UserInfo,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            books::CreatedResponse,
            // Loans
            crate::models::loan::LoanDetails,
            loans::BorrowRequest,
            loans::LoanResponse,
            loans::ReturnResponse,
            loans::LoanView,
            // Favorites
            crate::models::favorite::FavoriteBook,
            favorites::FavoriteResponse,
            // Events
            crate::services::events::LendingEvent,
            // Health
            health::HealthResponse,
            health::ReadinessResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and sign-in"),
        (name = "books", description = "Catalog management"),
        (name = "loans", description = "Borrowing and returning"),
        (name = "favorites", description = "Per-user favorites"),
        (name = "events", description = "Change notifications")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
