//! Book catalog handlers.
//!
//! Bodies are free-form JSON objects; only `title` is interpreted.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde_json::Value;

use crate::api::extractors::JsonBody;
use crate::api::AppState;
use crate::domain::Book;
use crate::errors::AppResult;
use crate::types::MessageResponse;

/// Create catalog routes
pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/:id", get(get_book).put(update_book).delete(delete_book))
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/books",
    tag = "Books",
    request_body(content = Object, description = "Book document with a unique title"),
    responses(
        (status = 200, description = "Created book including its id", body = Object),
        (status = 400, description = "Body is not a JSON object or has no title"),
        (status = 409, description = "A book with this title already exists"),
        (status = 500, description = "Store error")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<Value>,
) -> AppResult<Json<Book>> {
    let book = state.catalog_service.create_book(payload).await?;
    Ok(Json(book))
}

/// List every book
#[utoipa::path(
    get,
    path = "/books",
    tag = "Books",
    responses(
        (status = 200, description = "All books", body = [Object]),
        (status = 500, description = "Store error")
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.catalog_service.list_books().await?;
    Ok(Json(books))
}

/// Get a book by id
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "Books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book", body = Object),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.catalog_service.get_book(&id).await?;
    Ok(Json(book))
}

/// Update the supplied fields of a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "Books",
    params(("id" = String, Path, description = "Book ID")),
    request_body(content = Object, description = "Fields to change; `id` is ignored"),
    responses(
        (status = 200, description = "Book updated", body = MessageResponse),
        (status = 400, description = "No fields to update"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<Value>,
) -> AppResult<Json<MessageResponse>> {
    state.catalog_service.update_book(&id, payload).await?;
    Ok(Json(MessageResponse::new("Book updated successfully")))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "Books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found"),
        (status = 500, description = "Store reported no deletion")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.catalog_service.delete_book(&id).await?;
    Ok(Json(MessageResponse::new("Book deleted successfully")))
}
