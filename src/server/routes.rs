use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::server::{api, pages, AppState};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/countries",
            get(api::list_countries).fallback(api::method_not_allowed),
        )
        .route(
            "/api/countries/:id",
            get(api::country_by_id).fallback(api::method_not_allowed),
        )
        .route(
            "/api/holidays/:year",
            get(api::holidays_by_year).fallback(api::method_not_allowed),
        )
        .route("/", get(pages::home))
        .route("/countries", get(pages::country_index))
        .route("/countries/:id", get(pages::country_detail))
        .route("/holidays", get(pages::all_holidays))
        .route("/holidays/:year", get(pages::holidays_by_year))
        .fallback(pages::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
