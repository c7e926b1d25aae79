//! JSON endpoints. Each request loads the dataset once, projects it and answers
//! with a public cache policy; failures map onto [`ApiError`].

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::data::country::{CountryRecord, CountrySummary, EnrichedHoliday};
use crate::data::loader::{load, LoadError};
use crate::data::transform::{find_country, flatten_by_year, with_sorted_holidays};
use crate::server::AppState;

pub const CACHE_CONTROL: &str = "public, max-age=60, s-maxage=300, stale-while-revalidate=600";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("{0}")]
    NotFound(String),
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    /// The message is what the client sees; the cause stays in the logs.
    #[error("{message}")]
    Upstream {
        message: &'static str,
        #[source]
        source: LoadError,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn upstream(message: &'static str) -> impl FnOnce(LoadError) -> Self {
        move |source| Self::Upstream { message, source }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Upstream { message, source } = &self {
            tracing::error!(error = %source, response = *message, "answering with upstream failure");
        }
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        match self {
            Self::MethodNotAllowed => (status, [(header::ALLOW, "GET")], body).into_response(),
            _ => (status, body).into_response(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CountryListResponse {
    pub countries: Vec<CountrySummary>,
}

fn cached_json<T: Serialize>(payload: T) -> Response {
    ([(header::CACHE_CONTROL, CACHE_CONTROL)], Json(payload)).into_response()
}

/// Integer path parameter. Whole numbers written as `1.0` or `1e3` count too,
/// and values no record can carry still parse so they answer "no match".
#[derive(Debug, Clone, Copy, PartialEq)]
enum WholeNumber {
    Exact(i128),
    Approximate(f64),
}

impl WholeNumber {
    fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if let Ok(value) = trimmed.parse::<i128>() {
            return Some(Self::Exact(value));
        }
        let value: f64 = trimmed.parse().ok()?;
        (value.is_finite() && value.fract() == 0.0).then_some(Self::Approximate(value))
    }

    /// The value as `T`, or `None` when it does not fit.
    fn narrow<T: TryFrom<i128>>(self) -> Option<T> {
        let wide = match self {
            Self::Exact(value) => value,
            Self::Approximate(value) if value.abs() < 1e38 => value as i128,
            Self::Approximate(_) => return None,
        };
        T::try_from(wide).ok()
    }
}

impl std::fmt::Display for WholeNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(value) => write!(f, "{value}"),
            Self::Approximate(value) => write!(f, "{value}"),
        }
    }
}

/// GET /api/countries
pub async fn list_countries(State(state): State<AppState>) -> Result<Response, ApiError> {
    let countries = load(state.source.as_ref())
        .await
        .map_err(ApiError::upstream("Failed to load countries data"))?;
    let countries = countries.iter().map(CountrySummary::from).collect();
    Ok(cached_json(CountryListResponse { countries }))
}

/// GET /api/countries/{id}
pub async fn country_by_id(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let id = WholeNumber::parse(&raw_id)
        .ok_or(ApiError::Validation("Invalid or missing id parameter"))?;
    let countries = load(state.source.as_ref())
        .await
        .map_err(ApiError::upstream("Failed to load country data"))?;
    let country: CountryRecord = id
        .narrow::<i64>()
        .and_then(|id| find_country(&countries, id))
        .map(with_sorted_holidays)
        .ok_or_else(|| ApiError::NotFound(format!("Country with id '{id}' not found")))?;
    Ok(cached_json(country))
}

/// GET /api/holidays/{year}
pub async fn holidays_by_year(
    State(state): State<AppState>,
    Path(raw_year): Path<String>,
) -> Result<Response, ApiError> {
    let year = WholeNumber::parse(&raw_year)
        .ok_or(ApiError::Validation("Invalid or missing year parameter"))?;
    let countries = load(state.source.as_ref())
        .await
        .map_err(ApiError::upstream("Failed to load holidays data"))?;
    let holidays: Vec<EnrichedHoliday> = year
        .narrow::<i32>()
        .map(|year| flatten_by_year(&countries, year))
        .unwrap_or_default();
    Ok(cached_json(holidays))
}

/// Any verb other than GET/HEAD on an API route.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Unknown path under `/api`.
pub fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
