//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API, WebSocket endpoint, and OpenAPI documentation.

use crate::{
    handlers,
    models::{
        BrightnessPayload, DocSummary, ErrorResponse, InstallModulePayload, InterpretPayload,
        InterpretResponse, ProbePayload,
    },
    state::AppState,
    ws::ws_handler,
};

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_docs,
        handlers::get_doc,
        handlers::list_modules,
        handlers::install_module,
        handlers::search_catalog,
        handlers::toggle_module,
        handlers::update_module,
        handlers::uninstall_module,
        handlers::get_metrics,
        handlers::get_screen,
        handlers::toggle_fullscreen,
        handlers::toggle_lock,
        handlers::set_brightness,
        handlers::refresh_screen,
        handlers::optimize_screen,
        handlers::run_probe,
        handlers::probe_history,
        handlers::quick_endpoints,
        handlers::interpret,
        handlers::voice_history,
    ),
    components(
        schemas(DocSummary, InstallModulePayload, BrightnessPayload, ProbePayload, InterpretPayload, InterpretResponse, ErrorResponse)
    ),
    tags(
        (name = "Voice Assistant API", description = "Voice commands, screen control, module registry and API probing")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Group all routes that require AppState into their own router.
    let api_router = Router::new()
        .route("/docs", get(handlers::list_docs))
        .route("/docs/{slug}", get(handlers::get_doc))
        .route(
            "/modules",
            get(handlers::list_modules).post(handlers::install_module),
        )
        .route("/modules/catalog", get(handlers::search_catalog))
        .route("/modules/{id}", delete(handlers::uninstall_module))
        .route("/modules/{id}/toggle", patch(handlers::toggle_module))
        .route("/modules/{id}/update", post(handlers::update_module))
        .route("/metrics", get(handlers::get_metrics))
        .route("/screen", get(handlers::get_screen))
        .route("/screen/fullscreen", post(handlers::toggle_fullscreen))
        .route("/screen/lock", post(handlers::toggle_lock))
        .route("/screen/brightness", post(handlers::set_brightness))
        .route("/screen/refresh", post(handlers::refresh_screen))
        .route("/screen/optimize", post(handlers::optimize_screen))
        .route("/probe", post(handlers::run_probe))
        .route("/probe/history", get(handlers::probe_history))
        .route("/probe/endpoints", get(handlers::quick_endpoints))
        .route("/voice/interpret", post(handlers::interpret))
        .route("/voice/history", get(handlers::voice_history))
        .route("/ws", get(ws_handler))
        // Apply the state ONLY to this group of routes.
        .with_state(app_state);

    // Create the final router that merges the stateful routes
    // with the stateless routes (like Swagger UI).
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
