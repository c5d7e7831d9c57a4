//! Backend module - provider identities, the adapter trait, and the registry

pub mod gemini;
pub mod mock;
pub mod openai_compat;
pub mod registry;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::BackendError;

pub use gemini::GeminiBackend;
pub use openai_compat::OpenAICompatibleBackend;
pub use registry::BackendRegistry;

/// Identity of a text generation provider.
///
/// Declaration order is the order used for health and status reporting.
/// It is independent of the routing priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BackendId {
    Groq,
    Gemini,
    OpenRouter,
    /// LM Studio on the local network
    LmStudio,
}

impl BackendId {
    pub const ALL: [BackendId; 4] = [
        BackendId::Groq,
        BackendId::Gemini,
        BackendId::OpenRouter,
        BackendId::LmStudio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendId::LmStudio => "lmstudio",
            BackendId::Groq => "groq",
            BackendId::Gemini => "gemini",
            BackendId::OpenRouter => "openrouter",
        }
    }

    /// Local backends need no credential and are always enabled
    pub fn is_local(&self) -> bool {
        matches!(self, BackendId::LmStudio)
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BackendId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown provider '{}'", s))
    }
}

impl<'de> Deserialize<'de> for BackendId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Normalized reply of a single backend call
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    pub model: String,
}

/// Static description of a registered backend
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BackendStatus {
    pub id: BackendId,
    pub enabled: bool,
    pub local: bool,
    pub model: String,
    pub base_url: String,
}

/// Trait for text generation backends
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Get the backend identity
    fn id(&self) -> BackendId;

    /// Model name sent to the provider
    fn model(&self) -> &str;

    fn base_url(&self) -> &str;

    /// Whether the backend may be called at all
    fn is_enabled(&self) -> bool;

    /// Issue exactly one completion call. No retries.
    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<Completion, BackendError>;

    /// Lightweight reachability probe. Never fails, only reports.
    async fn check_health(&self) -> bool;

    fn status(&self) -> BackendStatus {
        BackendStatus {
            id: self.id(),
            enabled: self.is_enabled(),
            local: self.id().is_local(),
            model: self.model().to_string(),
            base_url: self.base_url().to_string(),
        }
    }
}
