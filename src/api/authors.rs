//! Author pages

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::{Form, WithRejection};

use super::{
    blocked, form_response, parse_id, CatalogForm,
    views::{AuthorFormPage, AuthorListPage, AuthorPage},
};
use crate::{
    error::AppResult,
    models::{Author, AuthorForm},
    services::{DeleteOutcome, FormState},
    AppState,
};

const AUTHOR_NOT_FOUND: &str = "Author not found";
const AUTHOR_LIST_URL: &str = "/catalog/authors";

/// List all authors, ordered by family name
#[utoipa::path(
    get,
    path = "/catalog/authors",
    tag = "authors",
    responses(
        (status = 200, description = "Author list", body = AuthorListPage)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<AuthorListPage>> {
    let authors = state.services.authors.list().await?;
    Ok(Json(AuthorListPage::new(&authors)))
}

/// Author detail with their books
#[utoipa::path(
    get,
    path = "/catalog/author/{id}",
    tag = "authors",
    params(
        ("id" = String, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author detail", body = AuthorPage),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AuthorPage>> {
    let id = parse_id(&id, AUTHOR_NOT_FOUND)?;
    let detail = state.services.authors.detail(id).await?;
    Ok(Json(AuthorPage::detail(&detail)))
}

/// Empty author form
#[utoipa::path(
    get,
    path = "/catalog/author/create",
    tag = "authors",
    responses(
        (status = 200, description = "Author form", body = AuthorFormPage)
    )
)]
pub async fn create_author_form() -> Json<AuthorFormPage> {
    Json(AuthorFormPage::create(FormState::new(AuthorForm::default(), ())))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/catalog/author/create",
    tag = "authors",
    request_body(content = AuthorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirects to the author"),
        (status = 422, description = "Invalid fields", body = AuthorFormPage)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    WithRejection(Form(form), _): CatalogForm<AuthorForm>,
) -> AppResult<Response> {
    let outcome = state.services.authors.create(form).await?;
    Ok(form_response(outcome, Author::url_for, AuthorFormPage::create))
}

/// Delete confirmation; redirects to the list when the author is gone
#[utoipa::path(
    get,
    path = "/catalog/author/{id}/delete",
    tag = "authors",
    params(
        ("id" = String, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Delete confirmation", body = AuthorPage),
        (status = 303, description = "Author does not exist")
    )
)]
pub async fn delete_author_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, AUTHOR_NOT_FOUND)?;
    Ok(match state.services.authors.delete_preview(id).await? {
        Some(detail) => Json(AuthorPage::delete(&detail)).into_response(),
        None => Redirect::to(AUTHOR_LIST_URL).into_response(),
    })
}

/// Delete an author that no book references
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/delete",
    tag = "authors",
    params(
        ("id" = String, Path, description = "Author ID")
    ),
    responses(
        (status = 303, description = "Deleted (or already gone), redirects to the list"),
        (status = 409, description = "Books still reference the author", body = AuthorPage)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, AUTHOR_NOT_FOUND)?;
    Ok(match state.services.authors.delete(id).await? {
        DeleteOutcome::Blocked { target, dependents } => {
            blocked(AuthorPage::blocked(&target, &dependents))
        }
        DeleteOutcome::Deleted | DeleteOutcome::AlreadyGone => {
            Redirect::to(AUTHOR_LIST_URL).into_response()
        }
    })
}

/// Author update form (not implemented)
#[utoipa::path(
    get,
    path = "/catalog/author/{id}/update",
    tag = "authors",
    params(
        ("id" = String, Path, description = "Author ID")
    ),
    responses(
        (status = 501, description = "Not implemented", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    update(state, &id).await
}

/// Author update (not implemented)
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/update",
    tag = "authors",
    params(
        ("id" = String, Path, description = "Author ID")
    ),
    responses(
        (status = 501, description = "Not implemented", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    update(state, &id).await
}

async fn update(state: AppState, id: &str) -> AppResult<Response> {
    let id = parse_id(id, AUTHOR_NOT_FOUND)?;
    let outcome = state.services.authors.update(id).await?;
    Ok(form_response(outcome, Author::url_for, AuthorFormPage::create))
}
