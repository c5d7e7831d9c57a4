//! Concurrent health probing of every registered backend

use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::backend::{BackendId, BackendRegistry};

/// Composite health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
        }
    }
}

/// Reachability of every backend at one point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSnapshot {
    pub status: HealthStatus,
    pub providers: BTreeMap<BackendId, bool>,
}

impl HealthSnapshot {
    pub fn from_probes(providers: BTreeMap<BackendId, bool>) -> Self {
        let status = if providers.values().any(|up| *up) {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        };
        Self { status, providers }
    }
}

/// Probes all backends on demand. Nothing is cached between calls.
pub struct HealthChecker {
    registry: Arc<BackendRegistry>,
    probe_timeout: Duration,
}

impl HealthChecker {
    pub fn new(registry: Arc<BackendRegistry>, probe_timeout: Duration) -> Self {
        Self {
            registry,
            probe_timeout,
        }
    }

    /// Probe every backend concurrently and wait for all of them
    pub async fn check_all(&self) -> HealthSnapshot {
        let probes = self.registry.iter().map(|(id, backend)| {
            let backend = backend.clone();
            let probe_timeout = self.probe_timeout;
            let handle = tokio::spawn(async move {
                match tokio::time::timeout(probe_timeout, backend.check_health()).await {
                    Ok(up) => up,
                    Err(_) => {
                        debug!(backend = %id, "Health probe timed out");
                        false
                    }
                }
            });
            async move {
                let up = match handle.await {
                    Ok(up) => up,
                    Err(e) => {
                        warn!(backend = %id, error = %e, "Health probe task failed");
                        false
                    }
                };
                (id, up)
            }
        });

        let providers: BTreeMap<BackendId, bool> = join_all(probes).await.into_iter().collect();
        HealthSnapshot::from_probes(providers)
    }
}
