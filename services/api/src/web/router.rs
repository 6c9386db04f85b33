//! services/api/src/web/router.rs
//!
//! Assembles the Axum router: API routes, CORS, request tracing, the upload
//! body limit and the Swagger UI.

use crate::{
    error::ApiError,
    web::{
        rest::{
            analyze_contract_handler, chat_handler, health_handler, root_handler,
            upload_handler, ApiDoc,
        },
        state::AppState,
    },
};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Room left in the request body for the multipart framing and text fields.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Builds the complete application router for the given state.
pub fn create_router(app_state: Arc<AppState>) -> Result<Router, ApiError> {
    let cors = cors_layer(&app_state.config.allowed_origins)?;
    let body_limit = app_state.config.validation.max_file_size + MULTIPART_OVERHEAD;

    let api_router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/upload", post(upload_handler))
        .route("/analyze-contract", post(analyze_contract_handler))
        .route("/chat", post(chat_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    Ok(Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())))
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, ApiError> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|e| {
                ApiError::Internal(format!("Invalid CORS origin '{}': {}", origin, e))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]))
}
