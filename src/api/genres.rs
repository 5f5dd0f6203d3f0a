//! Genre pages

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::{Form, WithRejection};

use super::{
    blocked, form_response, parse_id, CatalogForm,
    views::{GenreFormPage, GenreListPage, GenrePage},
};
use crate::{
    error::AppResult,
    models::{Genre, GenreForm},
    services::{DeleteOutcome, FormState},
    AppState,
};

const GENRE_NOT_FOUND: &str = "Genre not found";
const GENRE_LIST_URL: &str = "/catalog/genres";

/// List all genres, ordered by name
#[utoipa::path(
    get,
    path = "/catalog/genres",
    tag = "genres",
    responses(
        (status = 200, description = "Genre list", body = GenreListPage)
    )
)]
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Json<GenreListPage>> {
    let genres = state.services.genres.list().await?;
    Ok(Json(GenreListPage::new(&genres)))
}

/// Genre detail with its books
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}",
    tag = "genres",
    params(
        ("id" = String, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre detail", body = GenrePage),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<GenrePage>> {
    let id = parse_id(&id, GENRE_NOT_FOUND)?;
    let detail = state.services.genres.detail(id).await?;
    Ok(Json(GenrePage::detail(&detail)))
}

/// Empty genre form
#[utoipa::path(
    get,
    path = "/catalog/genre/create",
    tag = "genres",
    responses(
        (status = 200, description = "Genre form", body = GenreFormPage)
    )
)]
pub async fn create_genre_form() -> Json<GenreFormPage> {
    Json(GenreFormPage::new(
        "Create Genre",
        FormState::new(GenreForm::default(), ()),
    ))
}

/// Create a genre, or redirect to the existing one with the same name
#[utoipa::path(
    post,
    path = "/catalog/genre/create",
    tag = "genres",
    request_body(content = GenreForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created or matched, redirects to the genre"),
        (status = 422, description = "Invalid fields", body = GenreFormPage)
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    WithRejection(Form(form), _): CatalogForm<GenreForm>,
) -> AppResult<Response> {
    let outcome = state.services.genres.create(form).await?;
    Ok(form_response(outcome, Genre::url_for, |s| {
        GenreFormPage::new("Create Genre", s)
    }))
}

/// Delete confirmation; redirects to the list when the genre is gone
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}/delete",
    tag = "genres",
    params(
        ("id" = String, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Delete confirmation", body = GenrePage),
        (status = 303, description = "Genre does not exist")
    )
)]
pub async fn delete_genre_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, GENRE_NOT_FOUND)?;
    Ok(match state.services.genres.delete_preview(id).await? {
        Some(detail) => Json(GenrePage::delete(&detail)).into_response(),
        None => Redirect::to(GENRE_LIST_URL).into_response(),
    })
}

/// Delete a genre that no book references
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/delete",
    tag = "genres",
    params(
        ("id" = String, Path, description = "Genre ID")
    ),
    responses(
        (status = 303, description = "Deleted (or already gone), redirects to the list"),
        (status = 409, description = "Books still reference the genre", body = GenrePage)
    )
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, GENRE_NOT_FOUND)?;
    Ok(match state.services.genres.delete(id).await? {
        DeleteOutcome::Blocked { target, dependents } => {
            blocked(GenrePage::blocked(&target, &dependents))
        }
        DeleteOutcome::Deleted | DeleteOutcome::AlreadyGone => {
            Redirect::to(GENRE_LIST_URL).into_response()
        }
    })
}

/// Genre form pre-filled with the current name
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}/update",
    tag = "genres",
    params(
        ("id" = String, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre form", body = GenreFormPage),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_genre_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<GenreFormPage>> {
    let id = parse_id(&id, GENRE_NOT_FOUND)?;
    let form = state.services.genres.update_form(id).await?;
    Ok(Json(GenreFormPage::new("Update Genre", form)))
}

/// Rename a genre
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/update",
    tag = "genres",
    params(
        ("id" = String, Path, description = "Genre ID")
    ),
    request_body(content = GenreForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated, redirects to the genre"),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid fields", body = GenreFormPage)
    )
)]
pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Form(form), _): CatalogForm<GenreForm>,
) -> AppResult<Response> {
    let id = parse_id(&id, GENRE_NOT_FOUND)?;
    let outcome = state.services.genres.update(id, form).await?;
    Ok(form_response(outcome, Genre::url_for, |s| {
        GenreFormPage::new("Update Genre", s)
    }))
}
