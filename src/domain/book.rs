//! Book catalog entities.
//!
//! A book is a free-form JSON document with a mandatory `title` and a
//! store-generated identifier. Everything else the client sends is kept
//! verbatim in `fields`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{BOOK_ID_FIELD, BOOK_TITLE_FIELD};
use crate::errors::{AppError, AppResult};

/// Raised when a path segment is not in the store's identifier format
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a valid book id")]
pub struct InvalidBookId(pub String);

/// Store-generated book identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BookId(Uuid);

impl BookId {
    /// Allocate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for BookId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for BookId {
    type Err = InvalidBookId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| InvalidBookId(s.to_string()))
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

/// Stored book as returned to clients: `{"id": ..., "title": ..., ...fields}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Validated creation payload
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub fields: Map<String, Value>,
}

impl NewBook {
    /// Accept any JSON object carrying a non-empty string `title`.
    ///
    /// A client-supplied `id` is discarded; the store assigns identifiers.
    pub fn from_value(payload: Value) -> AppResult<Self> {
        let mut fields = into_object(payload)?;
        fields.remove(BOOK_ID_FIELD);

        let title = match fields.remove(BOOK_TITLE_FIELD) {
            Some(value) => take_title(value)?,
            None => return Err(AppError::bad_request("title is required")),
        };

        Ok(Self { title, fields })
    }

    /// Attach the generated identifier
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            fields: self.fields,
        }
    }
}

/// Partial update: only the supplied keys change
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub fields: Map<String, Value>,
}

impl BookPatch {
    /// Strip the immutable `id` and reject what is left if it is empty.
    pub fn from_value(payload: Value) -> AppResult<Self> {
        let mut fields = into_object(payload)?;
        fields.remove(BOOK_ID_FIELD);

        if fields.is_empty() {
            return Err(AppError::bad_request("No fields to update"));
        }

        let title = fields.remove(BOOK_TITLE_FIELD).map(take_title).transpose()?;
        Ok(Self { title, fields })
    }

    /// Merge into a stored book, leaving absent keys untouched
    pub fn apply_to(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        for (key, value) in &self.fields {
            book.fields.insert(key.clone(), value.clone());
        }
    }
}

fn into_object(payload: Value) -> AppResult<Map<String, Value>> {
    match payload {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::bad_request(
            "Request body must be a valid JSON object",
        )),
    }
}

fn take_title(value: Value) -> AppResult<String> {
    match value {
        Value::String(title) if !title.trim().is_empty() => Ok(title),
        _ => Err(AppError::bad_request("title must be a non-empty string")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_book_id_parse_and_format() {
        let id = BookId::generate();
        let parsed: BookId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_book_id_rejects_garbage() {
        let err = "not-an-id".parse::<BookId>().unwrap_err();
        assert_eq!(err, InvalidBookId("not-an-id".to_string()));
        assert!("".parse::<BookId>().is_err());
    }

    #[test]
    fn test_new_book_requires_object() {
        for payload in [json!([1, 2]), json!("title"), json!(null), json!(3)] {
            assert!(matches!(
                NewBook::from_value(payload),
                Err(AppError::BadRequest(_))
            ));
        }
    }

    #[test]
    fn test_new_book_requires_title() {
        let result = NewBook::from_value(json!({"author": "Machado de Assis"}));
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let result = NewBook::from_value(json!({"title": 42}));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_new_book_discards_client_id() {
        let book = NewBook::from_value(json!({
            "id": "client-chosen",
            "title": "Dom Casmurro",
            "year": 1899
        }))
        .unwrap();

        assert_eq!(book.title, "Dom Casmurro");
        assert!(!book.fields.contains_key("id"));
        assert_eq!(book.fields["year"], 1899);
    }

    #[test]
    fn test_book_serializes_flat() {
        let input = json!({"title": "Dom Casmurro", "author": "Machado de Assis", "tags": ["classic"]});
        let id = BookId::generate();
        let book = NewBook::from_value(input.clone()).unwrap().into_book(id);

        let mut expected = input;
        expected["id"] = json!(id.to_string());

        assert_eq!(serde_json::to_value(&book).unwrap(), expected);
    }

    #[test]
    fn test_patch_strips_id_and_rejects_empty() {
        let result = BookPatch::from_value(json!({"id": "x"}));
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let result = BookPatch::from_value(json!({}));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_patch_merges_only_supplied_fields() {
        let id = BookId::generate();
        let mut book = NewBook::from_value(json!({"title": "A", "author": "X", "pages": 10}))
            .unwrap()
            .into_book(id);

        let patch = BookPatch::from_value(json!({"id": "other", "pages": 12, "isbn": "123"})).unwrap();
        patch.apply_to(&mut book);

        assert_eq!(book.id, id);
        assert_eq!(book.title, "A");
        assert_eq!(book.fields["author"], "X");
        assert_eq!(book.fields["pages"], 12);
        assert_eq!(book.fields["isbn"], "123");
    }
}
