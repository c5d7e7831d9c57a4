//! Backend for OpenAI API compatible chat completion endpoints
//! (LM Studio, Groq, OpenRouter)

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::backend::{BackendId, Completion, TextBackend};
use crate::config::{ProviderConfig, TimeoutConfig};
use crate::error::{AppError, BackendError, Result};

/// Chat message for completion requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Chat completion request (OpenAI compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Chat completion response. Only the fields the gateway reads.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// OpenAI API compatible text backend
pub struct OpenAICompatibleBackend {
    id: BackendId,
    client: Client,
    base_url: String,
    model: String,
    auth_token: Option<String>,
    extra_headers: Vec<(HeaderName, HeaderValue)>,
    enabled: bool,
    generate_timeout: Duration,
    health_timeout: Duration,
}

impl OpenAICompatibleBackend {
    /// Create a new OpenAI compatible backend.
    ///
    /// Cloud backends are enabled only when a credential is configured;
    /// local ones are always enabled.
    pub fn new(id: BackendId, config: &ProviderConfig, timeouts: &TimeoutConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let auth_token = config.credential().map(str::to_string);
        let enabled = id.is_local() || auth_token.is_some();

        Ok(Self {
            id,
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            auth_token,
            extra_headers: Vec::new(),
            enabled,
            generate_timeout: Duration::from_secs(timeouts.generate_secs),
            health_timeout: Duration::from_secs(timeouts.health_secs),
        })
    }

    /// OpenRouter asks callers to identify themselves
    pub fn openrouter(config: &ProviderConfig, timeouts: &TimeoutConfig) -> Result<Self> {
        Ok(Self::new(BackendId::OpenRouter, config, timeouts)?
            .with_header("http-referer", "https://github.com/autometa")
            .with_header("x-title", "AutoMeta"))
    }

    /// Attach a static header sent with every request. Invalid headers are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.extra_headers.push((name, value));
        }
        self
    }

    /// Get headers with authentication
    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.auth_token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        for (name, value) in &self.extra_headers {
            headers.insert(name.clone(), value.clone());
        }

        headers
    }
}

#[async_trait]
impl TextBackend for OpenAICompatibleBackend {
    fn id(&self) -> BackendId {
        self.id
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> std::result::Result<Completion, BackendError> {
        if !self.enabled {
            return Err(BackendError::Unavailable {
                backend: self.id,
                reason: "no API key configured".to_string(),
            });
        }

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens,
            temperature,
        };

        debug!(backend = %self.id, model = %self.model, "Sending chat completion request");

        let timeout_secs = self.generate_timeout.as_secs();
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .headers(self.get_headers())
            .timeout(self.generate_timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(self.id, timeout_secs, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                backend: self.id,
                status: status.as_u16(),
                body,
            });
        }

        let result = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    return BackendError::from_reqwest(self.id, timeout_secs, e);
                }
                error!(backend = %self.id, error = %e, "Failed to parse chat completion response");
                BackendError::InvalidResponse {
                    backend: self.id,
                    message: format!("Failed to parse response: {}", e),
                }
            })?;

        let content = result
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| BackendError::InvalidResponse {
                backend: self.id,
                message: "response has no choices[0].message.content".to_string(),
            })?;

        Ok(Completion {
            content,
            model: self.model.clone(),
        })
    }

    async fn check_health(&self) -> bool {
        if !self.enabled {
            return false;
        }

        let result = self
            .client
            .get(format!("{}/models", self.base_url))
            .headers(self.get_headers())
            .timeout(self.health_timeout)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                debug!(backend = %self.id, "Health check passed");
                true
            }
            Ok(response) => {
                debug!(
                    backend = %self.id,
                    status = %response.status(),
                    "Health check failed"
                );
                false
            }
            Err(e) => {
                debug!(backend = %self.id, error = %e, "Health check failed");
                false
            }
        }
    }
}
