//! Book repository backed by the `books` table.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use serde_json::Value;

use super::entities::book::{self, ActiveModel, Entity as BookEntity};
use crate::domain::{Book, BookId, BookPatch, NewBook};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Book persistence contract.
///
/// Every method is a single store operation; no method spans two calls.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert a book, returning it with its generated id
    async fn insert(&self, book: NewBook) -> AppResult<Book>;

    /// All stored books, in no particular order
    async fn find_all(&self) -> AppResult<Vec<Book>>;

    /// Book by identifier
    async fn find_by_id(&self, id: BookId) -> AppResult<Option<Book>>;

    /// Merge the patch into the stored document; returns the matched count
    async fn update_fields(&self, id: BookId, patch: BookPatch) -> AppResult<u64>;

    /// Remove a book; returns the deleted count
    async fn delete(&self, id: BookId) -> AppResult<u64>;

    /// Whether any book already carries this exact title
    async fn exists_with_title(&self, title: &str) -> AppResult<bool>;
}

/// Concrete implementation of BookRepository
pub struct BookStore {
    db: DatabaseConnection,
}

impl BookStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepository for BookStore {
    async fn insert(&self, book: NewBook) -> AppResult<Book> {
        let active_model = ActiveModel {
            id: Set(BookId::generate().as_uuid()),
            title: Set(book.title),
            fields: Set(Value::Object(book.fields)),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_db_unique(e, "Book"))?;

        Ok(Book::from(model))
    }

    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let models = BookEntity::find()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Book::from).collect())
    }

    async fn find_by_id(&self, id: BookId) -> AppResult<Option<Book>> {
        let result = BookEntity::find_by_id(id.as_uuid())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Book::from))
    }

    async fn update_fields(&self, id: BookId, patch: BookPatch) -> AppResult<u64> {
        // jsonb `||` overwrites supplied keys and keeps the rest
        let mut update = BookEntity::update_many()
            .col_expr(
                book::Column::Fields,
                Expr::cust_with_values(
                    "\"fields\" || $1::jsonb",
                    [Value::Object(patch.fields)],
                ),
            )
            .filter(book::Column::Id.eq(id.as_uuid()));

        if let Some(title) = patch.title {
            update = update.col_expr(book::Column::Title, Expr::value(title));
        }

        let result = update
            .exec(&self.db)
            .await
            .map_err(|e| AppError::from_db_unique(e, "Book"))?;

        Ok(result.rows_affected)
    }

    async fn delete(&self, id: BookId) -> AppResult<u64> {
        let result = BookEntity::delete_by_id(id.as_uuid())
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }

    async fn exists_with_title(&self, title: &str) -> AppResult<bool> {
        let count = BookEntity::find()
            .filter(book::Column::Title.eq(title))
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(count > 0)
    }
}
