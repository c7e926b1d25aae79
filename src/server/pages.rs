//! HTML page handlers. `/` is rendered per request; the rest come from the
//! precomputed [`PageStore`](crate::server::page_store::PageStore).

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

use crate::data::loader::{load, LoadError};
use crate::data::transform::sort_countries_by_name;
use crate::server::api;
use crate::server::render;
use crate::server::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(render::not_found_page())).into_response()
}

fn failed(err: &LoadError) -> Response {
    tracing::error!(error = %err, "answering with the error page");
    (StatusCode::INTERNAL_SERVER_ERROR, Html(render::error_page())).into_response()
}

async fn precomputed(state: &AppState, path: &str) -> Response {
    match state.pages.snapshot().await {
        Ok(snapshot) => match snapshot.page(path) {
            Some(page) => Html(page.to_string()).into_response(),
            None => not_found(),
        },
        Err(err) => failed(&err),
    }
}

/// GET /
pub async fn home(State(state): State<AppState>) -> Response {
    match load(state.source.as_ref()).await {
        Ok(countries) => Html(render::home_page(&sort_countries_by_name(&countries))).into_response(),
        Err(err) => failed(&err),
    }
}

/// GET /countries
pub async fn country_index(State(state): State<AppState>) -> Response {
    precomputed(&state, "/countries").await
}

/// GET /countries/{id}. Only the exact prerendered paths exist, so `01`, `1.0`
/// or an id no record carries all land on the 404 page.
pub async fn country_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    precomputed(&state, &format!("/countries/{id}")).await
}

/// GET /holidays, optionally `?q=` for a server-applied search.
pub async fn all_holidays(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = params.q.unwrap_or_default();
    if query.trim().is_empty() {
        return precomputed(&state, "/holidays").await;
    }
    match state.pages.snapshot().await {
        Ok(snapshot) => Html(snapshot.search_page(&query)).into_response(),
        Err(err) => failed(&err),
    }
}

/// GET /holidays/{year}, same exact-path rule as the country pages.
pub async fn holidays_by_year(State(state): State<AppState>, Path(year): Path<String>) -> Response {
    precomputed(&state, &format!("/holidays/{year}")).await
}

/// Unmatched paths: JSON under `/api`, the HTML 404 page everywhere else.
pub async fn fallback(uri: Uri) -> Response {
    if uri.path() == "/api" || uri.path().starts_with("/api/") {
        api::route_not_found().into_response()
    } else {
        not_found()
    }
}
