//! Catalog home page

use axum::{extract::State, Json};

use super::views::HomePage;
use crate::AppState;

/// Home page with collection counts
///
/// Always answers 200; counts that could not be read are left empty and
/// reported in `error`.
#[utoipa::path(
    get,
    path = "/catalog",
    tag = "catalog",
    responses(
        (status = 200, description = "Collection counts", body = HomePage)
    )
)]
pub async fn index(State(state): State<AppState>) -> Json<HomePage> {
    let summary = state.services.catalog.home_summary().await;
    Json(summary.into())
}
