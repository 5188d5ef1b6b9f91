//! Unit of Work - centralized repository access.
//!
//! Every catalog and credential mutation is a single store statement, so the
//! unit of work only hands out repositories sharing one connection pool.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{BookRepository, BookStore, UserRepository, UserStore};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get the credential store
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get the book repository
    fn books(&self) -> Arc<dyn BookRepository>;
}

/// Concrete implementation of UnitOfWork over a SeaORM connection pool
pub struct Persistence {
    user_repo: Arc<UserStore>,
    book_repo: Arc<BookStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            book_repo: Arc::new(BookStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn books(&self) -> Arc<dyn BookRepository> {
        self.book_repo.clone()
    }
}
