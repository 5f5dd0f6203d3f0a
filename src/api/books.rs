//! Book pages

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::{Form, WithRejection};

use super::{
    blocked, form_response, parse_id, CatalogForm,
    views::{BookFormPage, BookListPage, BookPage},
};
use crate::{
    error::AppResult,
    models::{Book, BookForm},
    services::DeleteOutcome,
    AppState,
};

const BOOK_NOT_FOUND: &str = "Book not found";
const BOOK_LIST_URL: &str = "/catalog/books";

/// List all books with their authors, ordered by title
#[utoipa::path(
    get,
    path = "/catalog/books",
    tag = "books",
    responses(
        (status = 200, description = "Book list", body = BookListPage)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<BookListPage>> {
    let books = state.services.books.list().await?;
    Ok(Json(BookListPage::new(&books)))
}

/// Book detail with author, genres and copies
#[utoipa::path(
    get,
    path = "/catalog/book/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book detail", body = BookPage),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookPage>> {
    let id = parse_id(&id, BOOK_NOT_FOUND)?;
    let detail = state.services.books.detail(id).await?;
    Ok(Json(BookPage::detail(&detail)))
}

/// Empty book form with author and genre choices
#[utoipa::path(
    get,
    path = "/catalog/book/create",
    tag = "books",
    responses(
        (status = 200, description = "Book form", body = BookFormPage)
    )
)]
pub async fn create_book_form(State(state): State<AppState>) -> AppResult<Json<BookFormPage>> {
    let form = state.services.books.create_form().await?;
    Ok(Json(BookFormPage::new("Create Book", form)))
}

/// Create a book
///
/// `genre` may be repeated to select several genres.
#[utoipa::path(
    post,
    path = "/catalog/book/create",
    tag = "books",
    request_body(content = BookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirects to the book"),
        (status = 422, description = "Invalid fields", body = BookFormPage)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    WithRejection(Form(form), _): CatalogForm<BookForm>,
) -> AppResult<Response> {
    let outcome = state.services.books.create(form).await?;
    Ok(form_response(outcome, Book::url_for, |s| {
        BookFormPage::new("Create Book", s)
    }))
}

/// Delete confirmation; redirects to the list when the book is gone
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/delete",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Delete confirmation", body = BookPage),
        (status = 303, description = "Book does not exist")
    )
)]
pub async fn delete_book_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, BOOK_NOT_FOUND)?;
    Ok(match state.services.books.delete_preview(id).await? {
        Some(detail) => Json(BookPage::delete(&detail)).into_response(),
        None => Redirect::to(BOOK_LIST_URL).into_response(),
    })
}

/// Delete a book that has no copies
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/delete",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 303, description = "Deleted (or already gone), redirects to the list"),
        (status = 409, description = "Copies of the book still exist", body = BookPage)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, BOOK_NOT_FOUND)?;
    Ok(match state.services.books.delete(id).await? {
        DeleteOutcome::Blocked { target, .. } => blocked(BookPage::delete(&target)),
        DeleteOutcome::Deleted | DeleteOutcome::AlreadyGone => {
            Redirect::to(BOOK_LIST_URL).into_response()
        }
    })
}

/// Book form pre-filled, with the book's genres checked
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/update",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book form", body = BookFormPage),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookFormPage>> {
    let id = parse_id(&id, BOOK_NOT_FOUND)?;
    let form = state.services.books.update_form(id).await?;
    Ok(Json(BookFormPage::new("Update Book", form)))
}

/// Replace a book's fields
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/update",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    request_body(content = BookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated, redirects to the book"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid fields", body = BookFormPage)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Form(form), _): CatalogForm<BookForm>,
) -> AppResult<Response> {
    let id = parse_id(&id, BOOK_NOT_FOUND)?;
    let outcome = state.services.books.update(id, form).await?;
    Ok(form_response(outcome, Book::url_for, |s| {
        BookFormPage::new("Update Book", s)
    }))
}
