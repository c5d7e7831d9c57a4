//! API request and response models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::backend::{BackendId, BackendStatus};
use crate::error::{AppError, Result};
use crate::gateway::{GenerationResult, HealthSnapshot};

/// Content generation request
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct GenerateRequest {
    /// The prompt to generate content from
    pub prompt: String,

    /// Target platform (`twitter`, `linkedin`, `facebook`); selects a prompt prefix.
    /// Unknown platforms and `null` add no prefix.
    #[serde(default = "default_platform")]
    pub platform: Option<String>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Provider to try first; the others remain as fallbacks
    #[serde(default)]
    pub provider: Option<BackendId>,
}

fn default_platform() -> Option<String> {
    Some("twitter".to_string())
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.7
}

impl GenerateRequest {
    /// Reject values no provider accepts
    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            return Err(AppError::InvalidRequest(
                "max_tokens must be positive".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AppError::InvalidRequest(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}

/// Content generation response
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct GenerateResponse {
    pub content: String,
    pub provider: BackendId,
    pub model: String,
}

impl From<GenerationResult> for GenerateResponse {
    fn from(result: GenerationResult) -> Self {
        Self {
            content: result.content,
            provider: result.backend,
            model: result.model,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` if any provider is reachable, otherwise `degraded`
    pub status: String,
    #[schema(value_type = Object)]
    pub providers: BTreeMap<BackendId, bool>,
}

impl From<HealthSnapshot> for HealthResponse {
    fn from(snapshot: HealthSnapshot) -> Self {
        Self {
            status: snapshot.status.as_str().to_string(),
            providers: snapshot.providers,
        }
    }
}

/// Service descriptor
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub providers: Vec<BackendId>,
}

/// Provider list response
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ProviderListResponse {
    pub providers: Vec<BackendStatus>,
}

/// Error body
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}
