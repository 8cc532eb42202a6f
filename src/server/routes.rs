//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::calculate::{calculate, CalculateForm, FieldErrors};
use crate::coord::Coordinates;
use crate::error::Error;
use crate::geo::{Candidate, GeoBackend};
use crate::map::{MapEvent, MapView, Viewport};
use crate::server::state::AppState;
use crate::store::SelectedLocation;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/search", get(search_handler))
        .route(
            "/api/location",
            get(location_handler).put(update_location_handler),
        )
        .route("/api/geolocate", get(geolocate_handler))
        .route("/api/calculate", post(calculate_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (status, code) = match &err {
            Error::InvalidCoordinates(_) => (StatusCode::BAD_REQUEST, "INVALID_COORDINATES"),
            Error::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            Error::Geocoding(_) | Error::Http(_) => (StatusCode::BAD_GATEWAY, "GEOCODING_ERROR"),
            Error::Geolocation(_) => (StatusCode::SERVICE_UNAVAILABLE, "GEOLOCATION_ERROR"),
            Error::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        ApiError::new(status, code, err.to_string())
    }
}

/// Field-level validation failure (422)
#[derive(Debug, Serialize)]
pub struct ValidationErrors {
    pub errors: FieldErrors,
}

impl IntoResponse for ValidationErrors {
    fn into_response(self) -> Response {
        (StatusCode::UNPROCESSABLE_ENTITY, Json(self)).into_response()
    }
}

/// The stored location; an unreadable record counts as none
fn stored_location(state: &AppState) -> Option<SelectedLocation> {
    state.store.load().unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring unreadable stored location");
        None
    })
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    pub version: String,
    pub uptime_secs: u64,
    /// Whether a location has been selected
    pub has_location: bool,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
        has_location: stored_location(&state).is_some(),
    })
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub candidates: Vec<Candidate>,
}

/// Candidate lookup; clients debounce before calling
///
/// GET /api/search?q=
async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let candidates = if params.q.trim().is_empty() {
        Vec::new()
    } else {
        state.geocoder.search(&params.q).await?
    };

    Ok(Json(SearchResponse {
        query: params.q,
        candidates,
    }))
}

/// Selected location and the map view mounted on it
#[derive(Debug, Serialize)]
pub struct LocationResponse {
    /// None until something has been selected
    pub location: Option<SelectedLocation>,
    pub viewport: Viewport,
}

/// GET /api/location
async fn location_handler(State(state): State<Arc<AppState>>) -> Json<LocationResponse> {
    let location = stored_location(&state);
    let view = MapView::mount(location.as_ref(), &state.config.map);

    Json(LocationResponse {
        location,
        viewport: view.viewport(),
    })
}

/// A map interaction to confirm
#[derive(Debug, Deserialize)]
pub struct LocationUpdate {
    pub lat: f64,
    pub lng: f64,
    /// Place name when the position came from a search result
    pub label: Option<String>,
    pub zoom: Option<u8>,
    /// Reverse geocode an unlabeled position for its name
    #[serde(default)]
    pub named: bool,
}

/// Move the map and save the result as the selected location
///
/// PUT /api/location
async fn update_location_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<LocationUpdate>,
) -> Result<Json<LocationResponse>, ApiError> {
    let stored = stored_location(&state);
    let mut view = MapView::mount(stored.as_ref(), &state.config.map);
    if let Some(zoom) = update.zoom {
        view.set_zoom(zoom);
    }

    let event = match update.label {
        Some(label) => MapEvent::SearchResult(Candidate::new(label, update.lat, update.lng)),
        None => MapEvent::Click(Coordinates::new(update.lat, update.lng)),
    };
    view.apply(event)?;

    let location = if update.named {
        view.confirm_named(&state.geocoder).await?
    } else {
        view.confirm()?
    };
    state.store.save(&location)?;

    Ok(Json(LocationResponse {
        location: Some(location),
        viewport: view.viewport(),
    }))
}

/// Current position of the host; nothing is saved
///
/// GET /api/geolocate
async fn geolocate_handler(State(state): State<Arc<AppState>>) -> Result<Json<Viewport>, ApiError> {
    let stored = stored_location(&state);
    let mut view = MapView::mount(stored.as_ref(), &state.config.map);

    view.use_current_location(Some(&state.locator)).await;

    if let Some(message) = view.error() {
        return Err(ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "GEOLOCATION_ERROR",
            message,
        ));
    }
    Ok(Json(view.viewport()))
}

#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    #[serde(flatten)]
    pub form: CalculateForm,
    /// Defaults to the current year
    pub year: Option<i32>,
}

/// Estimate output at the selected location
///
/// POST /api/calculate
async fn calculate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CalculateRequest>,
) -> Response {
    let Some(location) = stored_location(&state) else {
        return ApiError::new(StatusCode::CONFLICT, "NO_LOCATION", "No location selected")
            .into_response();
    };
    let year = req.year.unwrap_or_else(|| chrono::Local::now().year());

    match calculate(&req.form, &location, year, &state.config.calculate) {
        Ok(estimate) => Json(estimate).into_response(),
        Err(errors) => ValidationErrors { errors }.into_response(),
    }
}
