//! Authentication handlers.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{JsonBody, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// User registration request
#[derive(Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Login name
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "bob")]
    pub username: String,
    /// Plaintext password, hashed before storage
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "p1")]
    pub password: String,
}

/// User login request
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "bob")]
    pub username: String,
    #[serde(default)]
    #[schema(example = "p1")]
    pub password: String,
}

// Keep plaintext passwords out of debug output
impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Create public authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Create routes that need a bearer token
pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(profile))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = MessageResponse),
        (status = 400, description = "Username or password missing"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    state
        .auth_service
        .register(payload.username, payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(payload.username, payload.password)
        .await?;

    Ok(Json(token))
}

/// Greet the authenticated caller
#[utoipa::path(
    get,
    path = "/profile",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller is authenticated", body = MessageResponse),
        (status = 401, description = "Missing, invalid or expired token")
    )
)]
pub async fn profile(Extension(current_user): Extension<CurrentUser>) -> Json<MessageResponse> {
    Json(MessageResponse::new(format!(
        "Logged in successfully! Welcome, {}!",
        current_user.username
    )))
}
