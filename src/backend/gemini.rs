//! Google Gemini backend using the native `generateContent` API

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::backend::{BackendId, Completion, TextBackend};
use crate::config::{ProviderConfig, TimeoutConfig};
use crate::error::{AppError, BackendError, Result};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, all parts joined
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let texts: Vec<String> = content.parts.into_iter().filter_map(|p| p.text).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

pub struct GeminiBackend {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    generate_timeout: Duration,
    health_timeout: Duration,
}

impl GeminiBackend {
    pub fn new(config: &ProviderConfig, timeouts: &TimeoutConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.credential().map(str::to_string),
            generate_timeout: Duration::from_secs(timeouts.generate_secs),
            health_timeout: Duration::from_secs(timeouts.health_secs),
        })
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(key) = &self.api_key {
            if let Ok(value) = HeaderValue::from_str(key) {
                headers.insert(API_KEY_HEADER, value);
            }
        }

        headers
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }
}

#[async_trait]
impl TextBackend for GeminiBackend {
    fn id(&self) -> BackendId {
        BackendId::Gemini
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> std::result::Result<Completion, BackendError> {
        if !self.is_enabled() {
            return Err(BackendError::Unavailable {
                backend: BackendId::Gemini,
                reason: "no API key configured".to_string(),
            });
        }

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: max_tokens,
                temperature,
            },
        };

        debug!(backend = %BackendId::Gemini, model = %self.model, "Sending generateContent request");

        let timeout_secs = self.generate_timeout.as_secs();
        let response = self
            .client
            .post(format!("{}:generateContent", self.model_url()))
            .headers(self.get_headers())
            .timeout(self.generate_timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(BackendId::Gemini, timeout_secs, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                backend: BackendId::Gemini,
                status: status.as_u16(),
                body,
            });
        }

        let result = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    return BackendError::from_reqwest(BackendId::Gemini, timeout_secs, e);
                }
                error!(backend = %BackendId::Gemini, error = %e, "Failed to parse generateContent response");
                BackendError::InvalidResponse {
                    backend: BackendId::Gemini,
                    message: format!("Failed to parse response: {}", e),
                }
            })?;

        let content = result.text().ok_or_else(|| BackendError::InvalidResponse {
            backend: BackendId::Gemini,
            message: "response has no candidate text".to_string(),
        })?;

        Ok(Completion {
            content,
            model: self.model.clone(),
        })
    }

    async fn check_health(&self) -> bool {
        if !self.is_enabled() {
            return false;
        }

        match self
            .client
            .get(self.model_url())
            .headers(self.get_headers())
            .timeout(self.health_timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                debug!(backend = %BackendId::Gemini, status = %response.status(), "Health check failed");
                false
            }
            Err(e) => {
                debug!(backend = %BackendId::Gemini, error = %e, "Health check failed");
                false
            }
        }
    }
}
