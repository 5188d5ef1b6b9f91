//! Catalog service - book create/read/update/delete contracts.
//!
//! Title uniqueness is checked before insert. The `books.title` unique index
//! catches the concurrent case the check alone would miss.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::domain::{Book, BookId, BookPatch, NewBook};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Catalog service trait for dependency injection.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Create a book from an arbitrary JSON object with a unique `title`
    async fn create_book(&self, payload: Value) -> AppResult<Book>;

    /// Every stored book
    async fn list_books(&self) -> AppResult<Vec<Book>>;

    /// Book by its string identifier
    async fn get_book(&self, id: &str) -> AppResult<Book>;

    /// Merge the supplied fields into a stored book
    async fn update_book(&self, id: &str, payload: Value) -> AppResult<()>;

    /// Remove a book
    async fn delete_book(&self, id: &str) -> AppResult<()>;
}

/// Malformed identifiers cannot name a stored book, so they read as absent.
fn parse_id(id: &str) -> AppResult<BookId> {
    id.parse::<BookId>().map_err(|e| {
        tracing::debug!("{}", e);
        AppError::not_found("Book")
    })
}

/// Concrete implementation of CatalogService using Unit of Work.
pub struct Catalog<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> Catalog<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for Catalog<U> {
    async fn create_book(&self, payload: Value) -> AppResult<Book> {
        let new_book = NewBook::from_value(payload)?;
        let books = self.uow.books();

        if books.exists_with_title(&new_book.title).await? {
            return Err(AppError::conflict(format!(
                "Book titled '{}'",
                new_book.title
            )));
        }

        let book = books.insert(new_book).await?;
        tracing::info!(book_id = %book.id, "book created");
        Ok(book)
    }

    async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.uow.books().find_all().await
    }

    async fn get_book(&self, id: &str) -> AppResult<Book> {
        let id = parse_id(id)?;
        self.uow.books().find_by_id(id).await?.ok_or_not_found("Book")
    }

    async fn update_book(&self, id: &str, payload: Value) -> AppResult<()> {
        let patch = BookPatch::from_value(payload)?;
        let id = parse_id(id)?;

        let matched = self.uow.books().update_fields(id, patch).await?;
        if matched == 0 {
            return Err(AppError::not_found("Book"));
        }

        tracing::info!(book_id = %id, "book updated");
        Ok(())
    }

    async fn delete_book(&self, id: &str) -> AppResult<()> {
        let id = parse_id(id)?;
        let books = self.uow.books();

        books.find_by_id(id).await?.ok_or_not_found("Book")?;

        // Existed a moment ago; zero here means someone else won the race
        let deleted = books.delete(id).await?;
        if deleted != 1 {
            return Err(AppError::internal(format!(
                "Book {} existed but the store deleted {} records",
                id, deleted
            )));
        }

        tracing::info!(book_id = %id, "book deleted");
        Ok(())
    }
}
