//! HTTP API tests driving the router in-process

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::{api, repository::Repository, seed, services::Services, AppConfig, AppState};

async fn app() -> Router {
    let config = AppConfig::default();
    let repository = Repository::in_memory().await.expect("in-memory database");
    repository
        .initialize_with_seed(&seed::seed_books())
        .await
        .expect("schema");
    let services = Services::new(repository, config.auth.clone(), config.lending.clone());
    api::create_router(AppState::new(config, services))
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn sign_up(app: &Router, username: &str, password: &str) -> String {
    let credentials = json!({ "username": username, "password": password });
    let (status, _) = send(app, Method::POST, "/api/v1/auth/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app, Method::POST, "/api/v1/auth/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("token").to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "data/library.db");

    let (status, body) = send(&app, Method::GET, "/api/v1/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["books"], seed::seed_books().len());
    assert_eq!(body["users"], 0);
    assert_eq!(body["active_loans"], 0);
    assert_eq!(body["overdue_loans"], 0);
}

#[tokio::test]
async fn test_readiness_counts_loans() {
    let app = app().await;
    let token = sign_up(&app, "alice", "pw1").await;

    let (status, _) = send(&app, Method::POST, "/api/v1/books/1/borrow", Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, Method::GET, "/api/v1/ready", None, None).await;
    assert_eq!(body["users"], 1);
    assert_eq!(body["active_loans"], 1);
    assert_eq!(body["overdue_loans"], 0);
}

#[tokio::test]
async fn test_register_login_me() {
    let app = app().await;
    let token = sign_up(&app, "alice", "pw1").await;

    let (status, body) = send(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert!(body.get("password_hash").is_none());

    let duplicate = json!({ "username": "alice", "password": "x" });
    let (status, body) = send(&app, Method::POST, "/api/v1/auth/register", None, Some(duplicate)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["user_id"].is_null());

    let wrong = json!({ "username": "alice", "password": "nope" });
    let (status, _) = send(&app, Method::POST, "/api/v1/auth/login", None, Some(wrong)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_requires_fields() {
    let app = app().await;

    let empty = json!({ "username": "", "password": "pw" });
    let (status, body) = send(&app, Method::POST, "/api/v1/auth/register", None, Some(empty)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_protected_routes_need_token() {
    let app = app().await;

    let (status, _) = send(&app, Method::POST, "/api/v1/books/1/borrow", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/v1/me/loans", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_and_search_books() {
    let app = app().await;

    let (status, all) = send(&app, Method::GET, "/api/v1/books", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), seed::seed_books().len());

    let (_, blank) = send(&app, Method::GET, "/api/v1/books?q=", None, None).await;
    assert_eq!(blank, all);

    let (_, found) = send(&app, Method::GET, "/api/v1/books?q=tolkien", None, None).await;
    let titles: Vec<&str> = found
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["The Hobbit", "The Lord of the Rings"]);

    let (status, _) = send(&app, Method::GET, "/api/v1/books/9999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_borrow_and_return_flow() {
    let app = app().await;
    let token = sign_up(&app, "alice", "pw1").await;

    let book = json!({ "title": "Dune Messiah", "author": "Frank Herbert", "year": 1969, "category": "SciFi" });
    let (status, created) = send(&app, Method::POST, "/api/v1/books", Some(&token), Some(book)).await;
    assert_eq!(status, StatusCode::CREATED);
    let book_id = created["id"].as_i64().unwrap();

    let uri = format!("/api/v1/books/{}/borrow", book_id);
    let (status, loan) = send(&app, Method::POST, &uri, Some(&token), Some(json!({ "days": 7 }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(loan["due_date"].is_string());

    let (status, _) = send(&app, Method::POST, &uri, Some(&token), Some(json!({ "days": 0 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, loans) = send(&app, Method::GET, "/api/v1/me/loans?active=true", Some(&token), None).await;
    let loans = loans.as_array().unwrap();
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0]["book"]["title"], "Dune Messiah");
    assert_eq!(loans[0]["overdue"], false);

    let uri = format!("/api/v1/books/{}/return", book_id);
    let (status, body) = send(&app, Method::POST, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["returned"], true);

    let (status, body) = send(&app, Method::POST, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["returned"], false);

    let (_, active) = send(&app, Method::GET, "/api/v1/me/loans?active=true", Some(&token), None).await;
    assert!(active.as_array().unwrap().is_empty());
    let (_, history) = send(&app, Method::GET, "/api/v1/me/loans", Some(&token), None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["due_message"], "returned");

    let uri = format!("/api/v1/books/{}", book_id);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_favorites_flow() {
    let app = app().await;
    let token = sign_up(&app, "alice", "pw1").await;

    let (status, body) = send(&app, Method::PUT, "/api/v1/books/1/favorite", Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["changed"], true);

    let (status, body) = send(&app, Method::PUT, "/api/v1/books/1/favorite", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], false);

    let (_, favorites) = send(&app, Method::GET, "/api/v1/me/favorites", Some(&token), None).await;
    assert_eq!(favorites.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, "/api/v1/books/1/favorite", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::DELETE, "/api/v1/books/1/favorite", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A book that was only favorited can be deleted
    send(&app, Method::PUT, "/api/v1/books/2/favorite", Some(&token), None).await;
    let (status, _) = send(&app, Method::DELETE, "/api/v1/books/2", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, "/api/v1/books/2", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
