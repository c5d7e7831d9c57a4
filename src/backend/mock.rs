//! Scripted in-process backend for exercising routing and health logic

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::backend::{BackendId, Completion, TextBackend};
use crate::error::BackendError;

/// What a mock backend does when asked to generate
#[derive(Debug, Clone)]
pub enum MockBehavior {
    Succeed { content: String },
    Fail { status: u16, body: String },
    Hang,
}

/// What a mock backend reports when probed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockHealth {
    Up,
    Down,
    Hang,
}

pub struct MockBackend {
    id: BackendId,
    model: String,
    enabled: bool,
    behavior: MockBehavior,
    health: MockHealth,
    generate_calls: AtomicUsize,
    health_calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new(id: BackendId, model: impl Into<String>) -> Self {
        Self {
            id,
            model: model.into(),
            enabled: true,
            behavior: MockBehavior::Succeed {
                content: format!("hello from {}", id),
            },
            health: MockHealth::Up,
            generate_calls: AtomicUsize::new(0),
            health_calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding(id: BackendId, content: &str, model: &str) -> Self {
        Self::new(id, model).with_behavior(MockBehavior::Succeed {
            content: content.to_string(),
        })
    }

    pub fn failing(id: BackendId, status: u16, body: &str) -> Self {
        Self::new(id, format!("{}-model", id))
            .with_behavior(MockBehavior::Fail {
                status,
                body: body.to_string(),
            })
            .with_health(MockHealth::Down)
    }

    pub fn disabled(id: BackendId) -> Self {
        let mut backend = Self::new(id, format!("{}-model", id));
        backend.enabled = false;
        backend
    }

    pub fn with_behavior(mut self, behavior: MockBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_health(mut self, health: MockHealth) -> Self {
        self.health = health;
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    /// Prompts received by `generate`, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl TextBackend for MockBackend {
    fn id(&self) -> BackendId {
        self.id
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn base_url(&self) -> &str {
        "mock://"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn generate(
        &self,
        prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<Completion, BackendError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());

        match &self.behavior {
            MockBehavior::Succeed { content } => Ok(Completion {
                content: content.clone(),
                model: self.model.clone(),
            }),
            MockBehavior::Fail { status, body } => Err(BackendError::Status {
                backend: self.id,
                status: *status,
                body: body.clone(),
            }),
            MockBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(BackendError::Timeout {
                    backend: self.id,
                    timeout_secs: 3600,
                })
            }
        }
    }

    async fn check_health(&self) -> bool {
        self.health_calls.fetch_add(1, Ordering::SeqCst);

        if !self.enabled {
            return false;
        }

        match self.health {
            MockHealth::Up => true,
            MockHealth::Down => false,
            MockHealth::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                true
            }
        }
    }
}
