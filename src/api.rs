// 🌐 HTTP API - Axum routes for sheets, verdicts and rankings
//
// Routes:
//   GET /api/health
//   GET /api/rankings
//   GET /api/city/:city
//   GET /api/city/:city/verdict?salary=<n>
//   everything else → static files from the public directory

use crate::error::ServiceError;
use crate::rankings::Rankings;
use crate::service::CityService;
use crate::verdict::Salary;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::error;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: CityService,
    pub rankings: Arc<Rankings>,
}

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VerdictQuery {
    salary: Option<String>,
}

fn error_response(err: ServiceError) -> Response {
    let status = match &err {
        ServiceError::EmptyCity | ServiceError::Budget(_) => StatusCode::BAD_REQUEST,
        ServiceError::Fetch(fetch) if fetch.is_not_found() => StatusCode::NOT_FOUND,
        ServiceError::Fetch(_) => StatusCode::BAD_GATEWAY,
    };

    let message = match status {
        StatusCode::NOT_FOUND => "City not found (or blocked)".to_string(),
        _ => err.to_string(),
    };

    if status.is_server_error() {
        error!(error = %err, "upstream fetch failed");
    }

    (status, Json(ApiResponse::err(message))).into_response()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/rankings - Static city index listing
async fn get_rankings(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.rankings.as_ref().clone()))
}

/// GET /api/city/:city - Raw cost sheet for a city
async fn get_city(State(state): State<AppState>, Path(city): Path<String>) -> Response {
    match state.service.sheet(&city).await {
        Ok(sheet) => (StatusCode::OK, Json(ApiResponse::ok(sheet))).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/city/:city/verdict?salary=N - Budget verdict for a salary
async fn get_verdict(
    State(state): State<AppState>,
    Path(city): Path<String>,
    Query(query): Query<VerdictQuery>,
) -> Response {
    let salary = match Salary::parse(query.salary.as_deref().unwrap_or("")) {
        Ok(salary) => salary,
        Err(e) => return error_response(e.into()),
    };

    match state.service.report(&city, salary).await {
        Ok(report) => (StatusCode::OK, Json(ApiResponse::ok(report))).into_response(),
        Err(e) => error_response(e),
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState, public_dir: &FsPath) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/rankings", get(get_rankings))
        .route("/city/:city", get(get_city))
        .route("/city/:city/verdict", get(get_verdict))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(public_dir))
        .layer(CorsLayer::permissive())
}
