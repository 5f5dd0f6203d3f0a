//! Book instance (copy) pages

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::{Form, WithRejection};

use super::{
    form_response, parse_id, CatalogForm,
    views::{BookInstanceFormPage, BookInstanceListPage, BookInstancePage},
};
use crate::{
    error::AppResult,
    models::{BookInstance, BookInstanceForm},
    AppState,
};

const COPY_NOT_FOUND: &str = "Book copy not found";
const COPY_LIST_URL: &str = "/catalog/bookinstances";

/// List all copies with their books, ordered by due date
#[utoipa::path(
    get,
    path = "/catalog/bookinstances",
    tag = "bookinstances",
    responses(
        (status = 200, description = "Copy list", body = BookInstanceListPage)
    )
)]
pub async fn list_book_instances(
    State(state): State<AppState>,
) -> AppResult<Json<BookInstanceListPage>> {
    let entries = state.services.book_instances.list().await?;
    Ok(Json(BookInstanceListPage::new(&entries)))
}

/// Copy detail
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}",
    tag = "bookinstances",
    params(
        ("id" = String, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Copy detail", body = BookInstancePage),
        (status = 404, description = "Copy not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookInstancePage>> {
    let id = parse_id(&id, COPY_NOT_FOUND)?;
    let entry = state.services.book_instances.detail(id).await?;
    Ok(Json(BookInstancePage::detail(&entry)))
}

/// Empty copy form with the book list and statuses
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    responses(
        (status = 200, description = "Copy form", body = BookInstanceFormPage)
    )
)]
pub async fn create_book_instance_form(
    State(state): State<AppState>,
) -> AppResult<Json<BookInstanceFormPage>> {
    let form = state.services.book_instances.create_form().await?;
    Ok(Json(BookInstanceFormPage::new("Create BookInstance", form)))
}

/// Create a copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    request_body(content = BookInstanceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirects to the copy"),
        (status = 422, description = "Invalid fields", body = BookInstanceFormPage)
    )
)]
pub async fn create_book_instance(
    State(state): State<AppState>,
    WithRejection(Form(form), _): CatalogForm<BookInstanceForm>,
) -> AppResult<Response> {
    let outcome = state.services.book_instances.create(form).await?;
    Ok(form_response(outcome, BookInstance::url_for, |s| {
        BookInstanceFormPage::new("Create BookInstance", s)
    }))
}

/// Delete confirmation; redirects to the list when the copy is gone
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(
        ("id" = String, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Delete confirmation", body = BookInstancePage),
        (status = 303, description = "Copy does not exist")
    )
)]
pub async fn delete_book_instance_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, COPY_NOT_FOUND)?;
    Ok(match state.services.book_instances.delete_preview(id).await? {
        Some(entry) => Json(BookInstancePage::delete(&entry)).into_response(),
        None => Redirect::to(COPY_LIST_URL).into_response(),
    })
}

/// Delete a copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(
        ("id" = String, Path, description = "Copy ID")
    ),
    responses(
        (status = 303, description = "Deleted (or already gone), redirects to the list")
    )
)]
pub async fn delete_book_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    let id = parse_id(&id, COPY_NOT_FOUND)?;
    state.services.book_instances.delete(id).await?;
    Ok(Redirect::to(COPY_LIST_URL))
}

/// Copy form pre-filled with the current values
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(
        ("id" = String, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Copy form", body = BookInstanceFormPage),
        (status = 404, description = "Copy not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book_instance_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookInstanceFormPage>> {
    let id = parse_id(&id, COPY_NOT_FOUND)?;
    let form = state.services.book_instances.update_form(id).await?;
    Ok(Json(BookInstanceFormPage::new("Update BookInstance", form)))
}

/// Replace a copy's fields
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(
        ("id" = String, Path, description = "Copy ID")
    ),
    request_body(content = BookInstanceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated, redirects to the copy"),
        (status = 404, description = "Copy not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid fields", body = BookInstanceFormPage)
    )
)]
pub async fn update_book_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Form(form), _): CatalogForm<BookInstanceForm>,
) -> AppResult<Response> {
    let id = parse_id(&id, COPY_NOT_FOUND)?;
    let outcome = state.services.book_instances.update(id, form).await?;
    Ok(form_response(outcome, BookInstance::url_for, |s| {
        BookInstanceFormPage::new("Update BookInstance", s)
    }))
}
