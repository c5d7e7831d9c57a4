//! HTTP route definitions

use crate::api::handlers;
use crate::api::models::*;
use crate::backend::{BackendId, BackendStatus};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LLM Gateway API",
        description = "Multi-provider text generation with priority-ordered fallback.",
        license(name = "MIT"),
    ),
    paths(
        handlers::generate,
        handlers::health_check,
        handlers::root,
        handlers::list_providers,
    ),
    components(schemas(
        BackendId,
        BackendStatus,
        GenerateRequest,
        GenerateResponse,
        HealthResponse,
        ServiceInfo,
        ProviderListResponse,
        ErrorResponse,
    )),
    tags(
        (name = "Generation", description = "Content generation"),
        (name = "Providers", description = "Provider configuration"),
        (name = "Health", description = "Health and service metadata"),
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_router(state: Arc<crate::AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/generate", post(handlers::generate))
        .route("/health", get(handlers::health_check))
        .route("/providers", get(handlers::list_providers))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
