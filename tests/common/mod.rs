//! Shared test fixtures: in-memory repositories and an HTTP driver.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use bookshelf_api::config::Config;
use bookshelf_api::domain::{Book, BookId, BookPatch, NewBook, User};
use bookshelf_api::errors::{AppError, AppResult};
use bookshelf_api::infra::{BookRepository, UnitOfWork, UserRepository};
use bookshelf_api::services::Services;
use bookshelf_api::{create_router, AppState};

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<HashMap<String, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(username).cloned())
    }

    async fn insert(&self, user: User) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&user.username) {
            return Err(AppError::conflict("User"));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }
}

impl InMemoryUsers {
    pub fn remove(&self, username: &str) {
        self.users.lock().unwrap().remove(username);
    }
}

#[derive(Default)]
pub struct InMemoryBooks {
    books: Mutex<HashMap<BookId, Book>>,
}

impl InMemoryBooks {
    pub fn len(&self) -> usize {
        self.books.lock().unwrap().len()
    }
}

#[async_trait]
impl BookRepository for InMemoryBooks {
    async fn insert(&self, book: NewBook) -> AppResult<Book> {
        let book = book.into_book(BookId::generate());
        self.books.lock().unwrap().insert(book.id, book.clone());
        Ok(book)
    }

    async fn find_all(&self) -> AppResult<Vec<Book>> {
        Ok(self.books.lock().unwrap().values().cloned().collect())
    }

    async fn find_by_id(&self, id: BookId) -> AppResult<Option<Book>> {
        Ok(self.books.lock().unwrap().get(&id).cloned())
    }

    /// Mirrors the unique index on `books.title`.
    async fn update_fields(&self, id: BookId, patch: BookPatch) -> AppResult<u64> {
        let mut books = self.books.lock().unwrap();
        if let Some(title) = &patch.title {
            if books
                .values()
                .any(|book| book.id != id && &book.title == title)
            {
                return Err(AppError::conflict("Book"));
            }
        }

        match books.get_mut(&id) {
            Some(book) => {
                patch.apply_to(book);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: BookId) -> AppResult<u64> {
        Ok(self.books.lock().unwrap().remove(&id).map_or(0, |_| 1))
    }

    async fn exists_with_title(&self, title: &str) -> AppResult<bool> {
        Ok(self
            .books
            .lock()
            .unwrap()
            .values()
            .any(|book| book.title == title))
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    pub users: Arc<InMemoryUsers>,
    pub books: Arc<InMemoryBooks>,
}

impl UnitOfWork for InMemoryStore {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn books(&self) -> Arc<dyn BookRepository> {
        self.books.clone()
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let config = Config::new("postgres://unused", TEST_SECRET).unwrap();
        let store = Arc::new(InMemoryStore::default());
        let services = Services::from_unit_of_work(store.clone(), &config);

        Self {
            router: create_router(AppState::from_services(&services)),
            store,
        }
    }

    /// Send a request and decode the JSON body (`Value::Null` for non-JSON).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<&str>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = builder
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, json)
    }

    pub async fn post(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body), None).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }
}
