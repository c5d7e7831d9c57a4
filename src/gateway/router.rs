//! Priority-ordered fallback routing across text backends

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::{BackendId, BackendRegistry};
use crate::config::settings::validate_priority;
use crate::error::{AppError, Result};

/// A single generation request as seen by the router
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub preferred_backend: Option<BackendId>,
}

/// Output of a successful routing pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    pub content: String,
    pub backend: BackendId,
    pub model: String,
}

/// Tries enabled backends one at a time until one succeeds
pub struct FallbackRouter {
    registry: Arc<BackendRegistry>,
    priority: Vec<BackendId>,
}

impl FallbackRouter {
    /// Create a router over `registry`. `priority` must name every
    /// registered backend exactly once.
    pub fn new(registry: Arc<BackendRegistry>, priority: Vec<BackendId>) -> Result<Self> {
        validate_priority(&priority, &registry.ids())?;
        Ok(Self { registry, priority })
    }

    pub fn priority(&self) -> &[BackendId] {
        &self.priority
    }

    /// Order in which backends are tried for a request
    pub fn trial_order(&self, preferred: Option<BackendId>) -> Vec<BackendId> {
        match preferred {
            Some(first) => std::iter::once(first)
                .chain(self.priority.iter().copied().filter(|id| *id != first))
                .collect(),
            None => self.priority.clone(),
        }
    }

    /// Generate with the first backend that succeeds
    pub async fn route(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let mut failures = Vec::new();

        for id in self.trial_order(request.preferred_backend) {
            let backend = self.registry.get(id)?;

            if !backend.is_enabled() {
                info!(backend = %id, "Backend is disabled, skipping");
                continue;
            }

            info!(backend = %id, model = %backend.model(), "Attempting generation");

            match backend
                .generate(&request.prompt, request.max_tokens, request.temperature)
                .await
            {
                Ok(completion) => {
                    info!(backend = %id, model = %completion.model, "Generation succeeded");
                    return Ok(GenerationResult {
                        content: completion.content,
                        backend: id,
                        model: completion.model,
                    });
                }
                Err(e) => {
                    warn!(backend = %id, error = %e, "Backend failed");
                    failures.push(e);
                }
            }
        }

        Err(AppError::AllBackendsFailed { failures })
    }
}
