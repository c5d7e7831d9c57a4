//! Gateway module - fallback routing, health aggregation, prompt templates

pub mod health_check;
pub mod prompt;
pub mod router;

pub use health_check::{HealthChecker, HealthSnapshot, HealthStatus};
pub use router::{FallbackRouter, GenerationRequest, GenerationResult};
