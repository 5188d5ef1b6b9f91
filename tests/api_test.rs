//! Integration tests for API endpoints.
//!
//! The full router runs against in-memory repositories, so no database
//! is required.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::TestApp;

const BOB: &str = r#"{"username":"bob","password":"p1"}"#;

async fn login_token(app: &TestApp, body: &str) -> String {
    let (status, json) = app.post("/login", body).await;
    assert_eq!(status, StatusCode::OK);
    json["access_token"].as_str().unwrap().to_string()
}

async fn create_book(app: &TestApp, body: Value) -> Value {
    let (status, json) = app.post("/books", &body.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    json
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_register_login_profile_flow() {
    let app = TestApp::new();

    let (status, json) = app.post("/register", BOB).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(json["message"].is_string());
    assert!(json.get("access_token").is_none());

    let (status, json) = app.post("/login", BOB).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["token_type"], "Bearer");
    let token = json["access_token"].as_str().unwrap().to_string();

    let (status, json) = app.send(Method::GET, "/profile", None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("bob"));

    let (status, _) = app.get("/profile").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_duplicate_is_conflict() {
    let app = TestApp::new();

    assert_eq!(app.post("/register", BOB).await.0, StatusCode::CREATED);
    let (status, json) = app.post("/register", r#"{"username":"bob","password":"other"}"#).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_register_missing_fields_is_bad_request() {
    let app = TestApp::new();

    for body in [
        r#"{"username":"bob"}"#,
        r#"{"password":"p1"}"#,
        r#"{"username":"","password":"p1"}"#,
        r#"{}"#,
    ] {
        let (status, _) = app.post("/register", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
    }
}

#[tokio::test]
async fn test_login_failures_share_one_response() {
    let app = TestApp::new();
    app.post("/register", BOB).await;

    let wrong_password = app.post("/login", r#"{"username":"bob","password":"nope"}"#).await;
    let unknown_user = app.post("/login", r#"{"username":"eve","password":"p1"}"#).await;

    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_user);
}

#[tokio::test]
async fn test_profile_rejects_bad_tokens() {
    let app = TestApp::new();

    let (status, _) = app.send(Method::GET, "/profile", None, Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    app.post("/register", BOB).await;
    let token = login_token(&app, BOB).await;
    let tampered = format!("{}x", token);
    let (status, json) = app.send(Method::GET, "/profile", None, Some(&tampered)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["code"], "AUTH_ERROR");
}

#[tokio::test]
async fn test_profile_for_removed_user_is_unauthorized() {
    let app = TestApp::new();
    app.post("/register", BOB).await;
    let token = login_token(&app, BOB).await;

    app.store.users.remove("bob");

    let (status, _) = app.send(Method::GET, "/profile", None, Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_create_then_get_returns_input_plus_id() {
    let app = TestApp::new();
    let input = json!({"title": "Dom Casmurro", "author": "Machado de Assis", "year": 1899});

    let created = create_book(&app, input.clone()).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = app.get(&format!("/books/{}", id)).await;
    assert_eq!(status, StatusCode::OK);

    let mut expected = input;
    expected["id"] = json!(id);
    assert_eq!(fetched, expected);
    assert_eq!(created, expected);
}

#[tokio::test]
async fn test_create_duplicate_title_conflicts_without_storing() {
    let app = TestApp::new();
    create_book(&app, json!({"title": "Iracema"})).await;

    let (status, json) = app.post("/books", r#"{"title":"Iracema","edition":2}"#).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "CONFLICT");
    assert_eq!(app.store.books.len(), 1);
}

#[tokio::test]
async fn test_create_rejects_malformed_body() {
    let app = TestApp::new();

    let (status, _) = app.post("/books", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post("/books", "[1, 2, 3]").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post("/books", r#"{"author":"nobody"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.store.books.len(), 0);
}

#[tokio::test]
async fn test_list_returns_every_book_with_string_ids() {
    let app = TestApp::new();
    create_book(&app, json!({"title": "A"})).await;
    create_book(&app, json!({"title": "B"})).await;

    let (status, json) = app.get("/books").await;
    assert_eq!(status, StatusCode::OK);

    let books = json.as_array().unwrap();
    assert_eq!(books.len(), 2);
    assert!(books.iter().all(|book| book["id"].is_string()));
}

#[tokio::test]
async fn test_get_unknown_or_malformed_id_is_not_found() {
    let app = TestApp::new();

    let (status, _) = app.get("/books/not-a-valid-id").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/books/6f1c2a7e-0000-4000-8000-000000000000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_merges_fields_and_keeps_id() {
    let app = TestApp::new();
    let created = create_book(&app, json!({"title": "O Cortiço", "author": "Aluísio Azevedo", "pages": 200})).await;
    let id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/books/{}", id);

    let (status, json) = app
        .send(Method::PUT, &uri, Some(r#"{"id":"forged","pages":240}"#), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].is_string());

    let (_, fetched) = app.get(&uri).await;
    assert_eq!(fetched["id"], json!(id));
    assert_eq!(fetched["title"], "O Cortiço");
    assert_eq!(fetched["author"], "Aluísio Azevedo");
    assert_eq!(fetched["pages"], 240);
}

#[tokio::test]
async fn test_update_to_taken_title_conflicts_and_changes_nothing() {
    let app = TestApp::new();
    let first = create_book(&app, json!({"title": "Memórias Póstumas", "pages": 300})).await;
    let second = create_book(&app, json!({"title": "Quincas Borba", "pages": 400})).await;
    let first_uri = format!("/books/{}", first["id"].as_str().unwrap());
    let second_uri = format!("/books/{}", second["id"].as_str().unwrap());

    let (status, json) = app
        .send(
            Method::PUT,
            &first_uri,
            Some(r#"{"title":"Quincas Borba","pages":1}"#),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "CONFLICT");

    assert_eq!(app.get(&first_uri).await.1, first);
    assert_eq!(app.get(&second_uri).await.1, second);
}

#[tokio::test]
async fn test_update_keeping_own_title_succeeds() {
    let app = TestApp::new();
    let created = create_book(&app, json!({"title": "Senhora", "pages": 100})).await;
    let uri = format!("/books/{}", created["id"].as_str().unwrap());

    let (status, _) = app
        .send(Method::PUT, &uri, Some(r#"{"title":"Senhora","pages":120}"#), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.get(&uri).await.1["pages"], 120);
}

#[tokio::test]
async fn test_update_rejects_empty_and_unknown() {
    let app = TestApp::new();
    let created = create_book(&app, json!({"title": "Senhora"})).await;
    let uri = format!("/books/{}", created["id"].as_str().unwrap());

    let (status, _) = app.send(Method::PUT, &uri, Some("{}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send(Method::PUT, &uri, Some(r#"{"id":"x"}"#), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Method::PUT,
            "/books/6f1c2a7e-0000-4000-8000-000000000000",
            Some(r#"{"pages":1}"#),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_succeeds_once() {
    let app = TestApp::new();
    let created = create_book(&app, json!({"title": "Macunaíma"})).await;
    let uri = format!("/books/{}", created["id"].as_str().unwrap());

    let (status, _) = app.send(Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Misc
// =============================================================================

#[tokio::test]
async fn test_health_without_database() {
    let app = TestApp::new();
    let (status, json) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_lists_catalog_and_auth_paths() {
    let app = TestApp::new();
    let (status, json) = app.get("/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    for path in ["/books", "/books/{id}", "/register", "/login", "/profile"] {
        assert!(json["paths"].get(path).is_some(), "missing {}", path);
    }
}
