use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;

// Route path constants - single source of truth for all API paths
pub const EMOJIS: &str = "/emojis";
pub const UPDATE_EMOJIS: &str = "/update-emojis";
pub const STATUS: &str = "/status";
pub const UPDATE_STATUS: &str = "/update-status";
pub const HEALTH: &str = "/health";

/// Build the full application router
///
/// Unmatched paths and unmatched methods on known paths both fall through to
/// the plain-text route listing. OPTIONS requests are answered by the CORS
/// layer before they reach the router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            EMOJIS,
            get(handlers::get_emojis_handler).fallback(handlers::index_handler),
        )
        .route(
            UPDATE_EMOJIS,
            post(handlers::update_emojis_handler).fallback(handlers::index_handler),
        )
        .route(
            STATUS,
            get(handlers::get_status_handler).fallback(handlers::index_handler),
        )
        .route(
            UPDATE_STATUS,
            post(handlers::update_status_handler).fallback(handlers::index_handler),
        )
        .route(
            HEALTH,
            get(handlers::health_handler).fallback(handlers::index_handler),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(handlers::index_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// Permissive CORS for browser readers; also answers OPTIONS preflights.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
