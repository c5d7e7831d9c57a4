//! HTTP request handlers

use crate::api::models::{
    GenerateRequest, GenerateResponse, HealthResponse, ProviderListResponse, ServiceInfo,
};
use crate::error::AppError;
use crate::gateway::{prompt, GenerationRequest};
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Generate content with automatic provider fallback
#[utoipa::path(
    post,
    path = "/generate",
    tag = "Generation",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Content generated", body = GenerateResponse),
        (status = 400, description = "Invalid request", body = crate::api::models::ErrorResponse),
        (status = 503, description = "Every provider failed", body = crate::api::models::ErrorResponse),
    )
)]
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    request.validate()?;

    let span = info_span!("generate", request_id = %Uuid::new_v4());

    async move {
        info!(
            platform = ?request.platform,
            provider = ?request.provider,
            max_tokens = request.max_tokens,
            "Received generation request"
        );

        let generation = GenerationRequest {
            prompt: prompt::apply_platform(request.platform.as_deref(), &request.prompt),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            preferred_backend: request.provider,
        };

        state
            .router
            .route(&generation)
            .await
            .map(|result| Json(GenerateResponse::from(result)))
    }
    .instrument(span)
    .await
}

/// Probe every provider
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Provider reachability", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.health.check_all().await;
    Json(HealthResponse::from(snapshot))
}

/// Service descriptor
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses((status = 200, description = "Service metadata", body = ServiceInfo))
)]
pub async fn root(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "LLM Gateway".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        providers: state.registry.ids(),
    })
}

/// List configured providers
#[utoipa::path(
    get,
    path = "/providers",
    tag = "Providers",
    responses((status = 200, description = "Configured providers", body = ProviderListResponse))
)]
pub async fn list_providers(State(state): State<Arc<AppState>>) -> Json<ProviderListResponse> {
    Json(ProviderListResponse {
        providers: state.registry.list(),
    })
}
