//! Axum Handlers for the REST API
//!
//! This module contains the logic for the dashboard panels: documentation,
//! modules, metrics, screen control, the API probe and the voice interpreter.
//! It uses `utoipa` doc comments to generate OpenAPI documentation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use assistant_core::{
    docs::{self, DOC_SECTIONS, DocSection},
    metrics::MetricsReport,
    probe::{ApiCallRecord, ProbeError, ProbeOutcome, ProbeRequest, QUICK_ENDPOINTS, QuickEndpoint},
    registry::{CatalogListing, Module, RegistryError},
    screen::ScreenStatus,
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    models::{
        BrightnessPayload, CatalogQuery, DocSummary, ErrorResponse, InstallModulePayload,
        InterpretPayload, InterpretResponse, ProbePayload,
    },
    state::AppState,
};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { message })).into_response()
            }
            ApiError::Conflict(message) => {
                (StatusCode::CONFLICT, Json(ErrorResponse { message })).into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                let message = "An internal server error occurred.".to_string();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { message }),
                )
                    .into_response()
            }
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(_) | RegistryError::NotInCatalog(_) => {
                ApiError::NotFound(err.to_string())
            }
            RegistryError::AlreadyInstalled(_) => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<ProbeError> for ApiError {
    fn from(err: ProbeError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// List the documentation sections.
#[utoipa::path(
    get,
    path = "/docs",
    responses(
        (status = 200, description = "Available documentation sections", body = [DocSummary])
    )
)]
pub async fn list_docs() -> Json<Vec<DocSummary>> {
    let sections = DOC_SECTIONS
        .iter()
        .map(|s| DocSummary {
            slug: s.slug.to_string(),
            title: s.title.to_string(),
        })
        .collect();
    Json(sections)
}

/// Get a documentation section by its slug.
#[utoipa::path(
    get,
    path = "/docs/{slug}",
    responses(
        (status = 200, description = "The section with its markdown content"),
        (status = 404, description = "Section not found", body = ErrorResponse)
    ),
    params(
        ("slug" = String, Path, description = "Section slug, e.g. `voice`")
    )
)]
pub async fn get_doc(Path(slug): Path<String>) -> Result<Json<DocSection>, ApiError> {
    docs::find_section(&slug)
        .copied()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Documentation section '{}' not found", slug)))
}

/// List installed modules.
#[utoipa::path(
    get,
    path = "/modules",
    responses(
        (status = 200, description = "Installed modules in installation order")
    )
)]
pub async fn list_modules(State(state): State<Arc<AppState>>) -> Json<Vec<Module>> {
    Json(state.registry.lock().await.list().to_vec())
}

/// Install a module from the catalog.
#[utoipa::path(
    post,
    path = "/modules",
    request_body = InstallModulePayload,
    responses(
        (status = 201, description = "Module installed and active"),
        (status = 404, description = "Module is not in the catalog", body = ErrorResponse),
        (status = 409, description = "Module is already installed", body = ErrorResponse)
    )
)]
pub async fn install_module(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<InstallModulePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let module = state.registry.lock().await.install(payload.name.trim())?;
    Ok((StatusCode::CREATED, Json(module)))
}

/// Search the module catalog.
#[utoipa::path(
    get,
    path = "/modules/catalog",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Catalog entries matching the search term")
    )
)]
pub async fn search_catalog(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CatalogQuery>,
) -> Json<Vec<CatalogListing>> {
    Json(state.registry.lock().await.search_catalog(&query.search))
}

/// Flip a module between active and inactive.
#[utoipa::path(
    patch,
    path = "/modules/{id}/toggle",
    responses(
        (status = 200, description = "Module with its new status"),
        (status = 404, description = "Module not found", body = ErrorResponse)
    ),
    params(
        ("id" = u32, Path, description = "Module id")
    )
)]
pub async fn toggle_module(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<Module>, ApiError> {
    Ok(Json(state.registry.lock().await.toggle(id)?))
}

/// Bump a module to its next minor version.
#[utoipa::path(
    post,
    path = "/modules/{id}/update",
    responses(
        (status = 200, description = "Module with its new version"),
        (status = 404, description = "Module not found", body = ErrorResponse)
    ),
    params(
        ("id" = u32, Path, description = "Module id")
    )
)]
pub async fn update_module(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<Module>, ApiError> {
    Ok(Json(state.registry.lock().await.update(id)?))
}

/// Uninstall a module.
#[utoipa::path(
    delete,
    path = "/modules/{id}",
    responses(
        (status = 204, description = "Module removed"),
        (status = 404, description = "Module not found", body = ErrorResponse)
    ),
    params(
        ("id" = u32, Path, description = "Module id")
    )
)]
pub async fn uninstall_module(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<StatusCode, ApiError> {
    state.registry.lock().await.uninstall(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Current performance metrics.
#[utoipa::path(
    get,
    path = "/metrics",
    responses(
        (status = 200, description = "Latest sample, statuses, uptime and recent history")
    )
)]
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<MetricsReport> {
    Json(state.metrics.read().await.report())
}

/// Current screen state and recent actions.
#[utoipa::path(
    get,
    path = "/screen",
    responses(
        (status = 200, description = "Screen state")
    )
)]
pub async fn get_screen(State(state): State<Arc<AppState>>) -> Json<ScreenStatus> {
    Json(state.screen.lock().await.status())
}

/// Toggle fullscreen mode.
#[utoipa::path(
    post,
    path = "/screen/fullscreen",
    responses(
        (status = 200, description = "Screen state after the toggle")
    )
)]
pub async fn toggle_fullscreen(State(state): State<Arc<AppState>>) -> Json<ScreenStatus> {
    let mut screen = state.screen.lock().await;
    screen.toggle_fullscreen();
    Json(screen.status())
}

/// Toggle the screen lock.
#[utoipa::path(
    post,
    path = "/screen/lock",
    responses(
        (status = 200, description = "Screen state after the toggle")
    )
)]
pub async fn toggle_lock(State(state): State<Arc<AppState>>) -> Json<ScreenStatus> {
    let mut screen = state.screen.lock().await;
    screen.toggle_lock();
    Json(screen.status())
}

/// Set the brightness. Out-of-range values are clamped to 20..=100.
#[utoipa::path(
    post,
    path = "/screen/brightness",
    request_body = BrightnessPayload,
    responses(
        (status = 200, description = "Screen state with the applied brightness")
    )
)]
pub async fn set_brightness(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BrightnessPayload>,
) -> Json<ScreenStatus> {
    let mut screen = state.screen.lock().await;
    screen.set_brightness(payload.value);
    Json(screen.status())
}

/// Refresh the display.
#[utoipa::path(
    post,
    path = "/screen/refresh",
    responses(
        (status = 200, description = "Screen state")
    )
)]
pub async fn refresh_screen(State(state): State<Arc<AppState>>) -> Json<ScreenStatus> {
    let mut screen = state.screen.lock().await;
    screen.refresh();
    Json(screen.status())
}

/// Switch to performance mode (full brightness).
#[utoipa::path(
    post,
    path = "/screen/optimize",
    responses(
        (status = 200, description = "Screen state")
    )
)]
pub async fn optimize_screen(State(state): State<Arc<AppState>>) -> Json<ScreenStatus> {
    let mut screen = state.screen.lock().await;
    screen.optimize();
    Json(screen.status())
}

/// Send a request to an external endpoint and record it in the call history.
///
/// Transport and parse failures are reported in the outcome with `success = false`;
/// only an invalid method or a missing endpoint is rejected.
#[utoipa::path(
    post,
    path = "/probe",
    request_body = ProbePayload,
    responses(
        (status = 200, description = "Status, elapsed time and formatted body"),
        (status = 400, description = "Invalid method or missing endpoint", body = ErrorResponse)
    )
)]
pub async fn run_probe(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ProbePayload>,
) -> Result<Json<ProbeOutcome>, ApiError> {
    let request = ProbeRequest::try_from(payload)?;
    let outcome = state.probe.execute(&request).await.inspect_err(|e| {
        warn!(error = %e, "Rejected probe request");
    })?;

    let record = ApiCallRecord::new(&request, &outcome, state.clock.as_ref());
    state.api_calls.lock().await.push(record);
    Ok(Json(outcome))
}

/// The most recent probe calls, oldest first.
#[utoipa::path(
    get,
    path = "/probe/history",
    responses(
        (status = 200, description = "Up to ten recorded calls")
    )
)]
pub async fn probe_history(State(state): State<Arc<AppState>>) -> Json<Vec<ApiCallRecord>> {
    Json(state.api_calls.lock().await.to_vec())
}

/// Preset endpoints offered by the probe panel.
#[utoipa::path(
    get,
    path = "/probe/endpoints",
    responses(
        (status = 200, description = "Quick endpoint presets")
    )
)]
pub async fn quick_endpoints() -> Json<&'static [QuickEndpoint]> {
    Json(QUICK_ENDPOINTS)
}

/// Interpret a recognized utterance and return the assistant's reply.
#[utoipa::path(
    post,
    path = "/voice/interpret",
    request_body = InterpretPayload,
    responses(
        (status = 200, description = "The classified intent and the reply", body = InterpretResponse)
    )
)]
pub async fn interpret(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<InterpretPayload>,
) -> Json<InterpretResponse> {
    let intent = state.interpreter.classify(&payload.text);
    let response = state.interpreter.respond(intent);
    info!(command = %payload.text, ?intent, "Voice command interpreted");

    state.voice_history.lock().await.push(payload.text);
    Json(InterpretResponse { intent, response })
}

/// The most recent voice commands, oldest first.
#[utoipa::path(
    get,
    path = "/voice/history",
    responses(
        (status = 200, description = "Up to five recent commands", body = [String])
    )
)]
pub async fn voice_history(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.voice_history.lock().await.to_vec())
}
