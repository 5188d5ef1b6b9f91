//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, book_handler};
use crate::domain::UserProfile;
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the Bookshelf API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "0.1.0",
        description = "Book catalog with user registration and JWT authentication",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Catalog endpoints
        book_handler::create_book,
        book_handler::list_books,
        book_handler::get_book,
        book_handler::update_book,
        book_handler::delete_book,
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::profile,
    ),
    components(
        schemas(
            UserProfile,
            MessageResponse,
            TokenResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Books", description = "Book catalog operations"),
        (name = "Authentication", description = "User registration, login and profile")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
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
                        .description(Some("JWT token obtained from /login"))
                        .build(),
                ),
            );
        }
    }
}
