//! API integration tests
//!
//! Drive the router in-process against the in-memory store.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use locallibrary_server::{api, repository::Repository, AppConfig, AppState};

fn app() -> Router {
    api::router(AppState::new(AppConfig::in_memory(), Repository::in_memory()))
}

struct Reply {
    status: StatusCode,
    location: Option<String>,
    body: Value,
}

async fn send(app: &Router, method: Method, uri: &str, form: Option<&str>) -> Reply {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match form {
        Some(form) => {
            request = request.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            Body::from(form.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|value| value.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    Reply { status, location, body }
}

async fn get(app: &Router, uri: &str) -> Reply {
    send(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, form: &str) -> Reply {
    send(app, Method::POST, uri, Some(form)).await
}

/// Submit a form that must succeed; returns the entity URL
async fn create(app: &Router, uri: &str, form: &str) -> String {
    let reply = post(app, uri, form).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER, "{}: {}", uri, reply.body);
    reply.location.unwrap()
}

fn id_of(url: &str) -> &str {
    url.rsplit('/').next().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = app();

    let reply = get(&app, "/health").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "healthy");

    let reply = get(&app, "/ready").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "ready");
}

#[tokio::test]
async fn test_home_summary() {
    let app = app();
    create(&app, "/catalog/genre/create", "name=Fantasy").await;
    create(&app, "/catalog/author/create", "first_name=Ursula&family_name=LeGuin").await;

    let reply = get(&app, "/catalog").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["title"], "Local Library Home");
    assert_eq!(reply.body["error"], Value::Null);
    assert_eq!(reply.body["data"]["genre_count"], 1);
    assert_eq!(reply.body["data"]["author_count"], 1);
    assert_eq!(reply.body["data"]["book_count"], 0);
    assert_eq!(reply.body["data"]["book_instance_available_count"], 0);
}

#[tokio::test]
async fn test_genre_create_is_idempotent_by_name() {
    let app = app();

    let first = create(&app, "/catalog/genre/create", "name=Fantasy").await;
    let second = create(&app, "/catalog/genre/create", "name=Fantasy").await;
    assert_eq!(first, second);

    let reply = get(&app, "/catalog/genres").await;
    assert_eq!(reply.body["genre_list"].as_array().unwrap().len(), 1);

    let reply = get(&app, &first).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["title"], "Genre Detail");
    assert_eq!(reply.body["genre"]["name"], "Fantasy");
}

#[tokio::test]
async fn test_author_form_errors_are_rendered() {
    let app = app();

    let reply = post(&app, "/catalog/author/create", "first_name=&family_name=Asimov").await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.body["title"], "Create Author");
    assert_eq!(reply.body["author"]["family_name"], "Asimov");
    assert_eq!(reply.body["errors"][0]["field"], "first_name");
    assert_eq!(reply.body["errors"][0]["message"], "First name must be specified");

    let reply = get(&app, "/catalog/authors").await;
    assert!(reply.body["author_list"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_author_detail_and_derived_fields() {
    let app = app();
    let url = create(
        &app,
        "/catalog/author/create",
        "first_name=Isaac&family_name=Asimov&date_of_birth=1920-01-02&date_of_death=1992-04-06",
    )
    .await;

    let reply = get(&app, &url).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["author"]["name"], "Asimov, Isaac");
    assert_eq!(reply.body["author"]["lifespan"], 72);
    assert_eq!(reply.body["author"]["url"], url);
}

#[tokio::test]
async fn test_book_delete_blocked_by_copies() {
    let app = app();
    let author = create(&app, "/catalog/author/create", "first_name=Frank&family_name=Herbert").await;
    let genre = create(&app, "/catalog/genre/create", "name=Science+Fiction").await;
    let book = create(
        &app,
        "/catalog/book/create",
        &format!(
            "title=Dune&author={}&summary=Spice.&isbn=9780441013593&genre={}",
            id_of(&author),
            id_of(&genre)
        ),
    )
    .await;
    for _ in 0..2 {
        create(
            &app,
            "/catalog/bookinstance/create",
            &format!("book={}&imprint=Ace&status=Available&due_back=", id_of(&book)),
        )
        .await;
    }

    let reply = post(&app, &format!("{}/delete", book), "").await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.body["title"], "Delete Book");
    assert_eq!(reply.body["book"]["author"]["name"], "Herbert, Frank");
    assert_eq!(reply.body["book"]["genre"][0]["name"], "Science Fiction");
    assert_eq!(reply.body["book_instances"].as_array().unwrap().len(), 2);

    let confirm = get(&app, &format!("{}/delete", book)).await;
    assert_eq!(confirm.status, StatusCode::OK);
    assert_eq!(confirm.body, reply.body);

    let reply = get(&app, &book).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["title"], "Dune");
    assert_eq!(reply.body["book"]["author"]["name"], "Herbert, Frank");
    assert_eq!(reply.body["book"]["genre"][0]["name"], "Science Fiction");

    let reply = get(&app, "/catalog").await;
    assert_eq!(reply.body["data"]["book_instance_available_count"], 2);
}

#[tokio::test]
async fn test_book_form_keeps_checked_genres() {
    let app = app();
    let fantasy = create(&app, "/catalog/genre/create", "name=Fantasy").await;
    create(&app, "/catalog/genre/create", "name=Poetry").await;

    let reply = post(
        &app,
        "/catalog/book/create",
        &format!("title=&author=&summary=&isbn=&genre={}", id_of(&fantasy)),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.body["title"], "Create Book");

    let genres = reply.body["genres"].as_array().unwrap();
    let checked: Vec<&str> = genres
        .iter()
        .filter(|g| g["checked"] == true)
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(checked, vec!["Fantasy"]);

    let fields: Vec<&str> = reply.body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["title", "author", "summary", "isbn"]);
}

#[tokio::test]
async fn test_delete_of_missing_entity_redirects_to_list() {
    let app = app();
    let url = create(&app, "/catalog/genre/create", "name=Horror").await;

    let reply = post(&app, &format!("{}/delete", url), "").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/catalog/genres"));

    let reply = get(&app, &format!("{}/delete", url)).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/catalog/genres"));

    let reply = post(&app, &format!("{}/delete", url), "").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let app = app();

    let reply = get(&app, "/catalog/book/6f1c2a4e-6a8b-4d7e-9c2f-0b1a2c3d4e5f").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["message"], "Book not found");

    let reply = get(&app, "/catalog/author/not-an-id").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let reply = get(&app, "/catalog/bookinstance/6f1c2a4e-6a8b-4d7e-9c2f-0b1a2c3d4e5f/update").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_author_update_not_implemented() {
    let app = app();
    let url = create(&app, "/catalog/author/create", "first_name=Ben&family_name=Bova").await;

    let reply = get(&app, &format!("{}/update", url)).await;
    assert_eq!(reply.status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(reply.body["message"], "NOT IMPLEMENTED: Author update");

    let reply = post(&app, &format!("{}/update", url), "first_name=Ben").await;
    assert_eq!(reply.status, StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn test_book_instance_update_and_copy_title() {
    let app = app();
    let author = create(&app, "/catalog/author/create", "first_name=Iain&family_name=Banks").await;
    let book = create(
        &app,
        "/catalog/book/create",
        &format!("title=Excession&author={}&summary=Outside+Context.&isbn=9780553575378", id_of(&author)),
    )
    .await;
    let copy = create(
        &app,
        "/catalog/bookinstance/create",
        &format!("book={}&imprint=Orbit&status=&due_back=2026-12-24", id_of(&book)),
    )
    .await;

    let reply = get(&app, &copy).await;
    assert_eq!(reply.body["title"], "Copy: Excession");
    assert_eq!(reply.body["bookinstance"]["status"], "Maintenance");
    assert_eq!(reply.body["bookinstance"]["due_back_formatted"], "December 24th, 2026");

    let reply = post(
        &app,
        &format!("{}/update", copy),
        &format!("book={}&imprint=Orbit&status=Lost&due_back=2026-12-24", id_of(&book)),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.body["title"], "Update BookInstance");
    assert_eq!(reply.body["errors"][0]["field"], "status");

    let updated = create(
        &app,
        &format!("{}/update", copy),
        &format!("book={}&imprint=Orbit&status=Loaned&due_back=2026-12-24", id_of(&book)),
    )
    .await;
    assert_eq!(updated, copy);
    assert_eq!(get(&app, &copy).await.body["bookinstance"]["status"], "Loaned");

    let reply = post(&app, &format!("{}/delete", copy), "").await;
    assert_eq!(reply.location.as_deref(), Some("/catalog/bookinstances"));
    assert_eq!(get(&app, &copy).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_form_without_content_type_is_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/catalog/genre/create")
        .body(Body::from("name=Poetry"))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
