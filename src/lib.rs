//! LLM Gateway
//!
//! Forwards text generation requests to one of several interchangeable LLM
//! providers (LM Studio, Groq, Gemini, OpenRouter), trying them in priority
//! order and falling back to the next provider when one fails.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod gateway;

pub use error::{AppError, BackendError, Result};

use std::sync::Arc;
use std::time::Duration;

use backend::BackendRegistry;
use gateway::{FallbackRouter, HealthChecker};

/// Application state shared across all handlers. Read-only after startup.
pub struct AppState {
    pub settings: Arc<config::Settings>,
    pub registry: Arc<BackendRegistry>,
    pub router: Arc<FallbackRouter>,
    pub health: Arc<HealthChecker>,
}

impl AppState {
    /// Build the state from settings, constructing every provider adapter
    pub fn from_settings(settings: config::Settings) -> Result<Self> {
        let registry = BackendRegistry::from_settings(&settings.providers, &settings.timeouts)?;
        Self::with_registry(settings, Arc::new(registry))
    }

    /// Build the state around an existing registry
    pub fn with_registry(settings: config::Settings, registry: Arc<BackendRegistry>) -> Result<Self> {
        let router = FallbackRouter::new(registry.clone(), settings.priority.clone())?;
        let health = HealthChecker::new(
            registry.clone(),
            Duration::from_secs(settings.timeouts.health_secs),
        );

        Ok(Self {
            settings: Arc::new(settings),
            registry,
            router: Arc::new(router),
            health: Arc::new(health),
        })
    }
}
