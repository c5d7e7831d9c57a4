//! Backend registry holding one adapter per provider

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::backend::{
    BackendId, BackendStatus, GeminiBackend, OpenAICompatibleBackend, TextBackend,
};
use crate::config::{ProvidersConfig, TimeoutConfig};
use crate::error::{AppError, Result};

/// Fixed mapping from provider identity to its adapter.
///
/// Populated once at startup and never mutated afterwards.
pub struct BackendRegistry {
    backends: BTreeMap<BackendId, Arc<dyn TextBackend>>,
}

impl BackendRegistry {
    /// Build every provider adapter from resolved configuration
    pub fn from_settings(providers: &ProvidersConfig, timeouts: &TimeoutConfig) -> Result<Self> {
        let mut backends: Vec<Arc<dyn TextBackend>> = Vec::with_capacity(BackendId::ALL.len());

        for id in BackendId::ALL {
            let config = providers.get(id);
            let backend: Arc<dyn TextBackend> = match id {
                BackendId::LmStudio | BackendId::Groq => {
                    Arc::new(OpenAICompatibleBackend::new(id, config, timeouts)?)
                }
                BackendId::Gemini => Arc::new(GeminiBackend::new(config, timeouts)?),
                BackendId::OpenRouter => {
                    Arc::new(OpenAICompatibleBackend::openrouter(config, timeouts)?)
                }
            };
            backends.push(backend);
        }

        Self::from_backends(backends)
    }

    /// Build a registry from already constructed adapters
    pub fn from_backends(backends: Vec<Arc<dyn TextBackend>>) -> Result<Self> {
        let mut map = BTreeMap::new();

        for backend in backends {
            let id = backend.id();
            info!(
                backend = %id,
                model = %backend.model(),
                enabled = backend.is_enabled(),
                "Registered backend"
            );
            if map.insert(id, backend).is_some() {
                return Err(AppError::Internal(format!(
                    "Backend '{}' registered twice",
                    id
                )));
            }
        }

        Ok(Self { backends: map })
    }

    /// Get a backend by identity
    pub fn get(&self, id: BackendId) -> Result<Arc<dyn TextBackend>> {
        self.backends
            .get(&id)
            .cloned()
            .ok_or(AppError::BackendNotFound(id))
    }

    /// Iterate over all backends in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (BackendId, &Arc<dyn TextBackend>)> {
        self.backends.iter().map(|(id, backend)| (*id, backend))
    }

    pub fn ids(&self) -> Vec<BackendId> {
        self.backends.keys().copied().collect()
    }

    /// List all backends with their static status
    pub fn list(&self) -> Vec<BackendStatus> {
        self.backends.values().map(|b| b.status()).collect()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
