//! Unit tests for the health checker

use llm_gateway::backend::mock::{MockBackend, MockHealth};
use llm_gateway::backend::{BackendId, BackendRegistry, TextBackend};
use llm_gateway::gateway::{HealthChecker, HealthStatus};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn checker(backends: Vec<Arc<MockBackend>>, probe_timeout: Duration) -> HealthChecker {
    let backends: Vec<Arc<dyn TextBackend>> = backends
        .into_iter()
        .map(|b| b as Arc<dyn TextBackend>)
        .collect();
    let registry = Arc::new(BackendRegistry::from_backends(backends).unwrap());
    HealthChecker::new(registry, probe_timeout)
}

#[tokio::test]
async fn test_healthy_when_any_backend_up() {
    let checker = checker(
        vec![
            MockBackend::new(BackendId::LmStudio, "m").with_health(MockHealth::Down).into_arc(),
            MockBackend::new(BackendId::Groq, "m").with_health(MockHealth::Up).into_arc(),
            MockBackend::disabled(BackendId::Gemini).into_arc(),
            MockBackend::new(BackendId::OpenRouter, "m").with_health(MockHealth::Down).into_arc(),
        ],
        Duration::from_secs(5),
    );

    let snapshot = checker.check_all().await;

    assert_eq!(snapshot.status, HealthStatus::Healthy);
    assert_eq!(snapshot.providers.len(), 4);
    assert_eq!(snapshot.providers[&BackendId::Groq], true);
    assert_eq!(snapshot.providers[&BackendId::Gemini], false);
    assert_eq!(snapshot.providers[&BackendId::LmStudio], false);
}

#[tokio::test]
async fn test_degraded_when_all_down() {
    let checker = checker(
        BackendId::ALL
            .into_iter()
            .map(|id| MockBackend::new(id, "m").with_health(MockHealth::Down).into_arc())
            .collect(),
        Duration::from_secs(5),
    );

    let snapshot = checker.check_all().await;

    assert_eq!(snapshot.status, HealthStatus::Degraded);
    assert!(snapshot.providers.values().all(|up| !up));
}

#[tokio::test]
async fn test_hanging_probe_counts_as_down() {
    let checker = checker(
        vec![
            MockBackend::new(BackendId::LmStudio, "m").with_health(MockHealth::Hang).into_arc(),
            MockBackend::new(BackendId::Groq, "m").with_health(MockHealth::Up).into_arc(),
        ],
        Duration::from_millis(100),
    );

    let started = Instant::now();
    let snapshot = checker.check_all().await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(snapshot.providers[&BackendId::LmStudio], false);
    assert_eq!(snapshot.providers[&BackendId::Groq], true);
    assert_eq!(snapshot.status, HealthStatus::Healthy);
}

#[tokio::test]
async fn test_probes_run_concurrently() {
    // Four hanging probes bounded at 200ms finish together, not one after another
    let checker = checker(
        BackendId::ALL
            .into_iter()
            .map(|id| MockBackend::new(id, "m").with_health(MockHealth::Hang).into_arc())
            .collect(),
        Duration::from_millis(200),
    );

    let started = Instant::now();
    let snapshot = checker.check_all().await;

    assert!(started.elapsed() < Duration::from_millis(700));
    assert_eq!(snapshot.status, HealthStatus::Degraded);
}

#[tokio::test]
async fn test_every_backend_probed_each_time() {
    let backends: Vec<Arc<MockBackend>> = BackendId::ALL
        .into_iter()
        .map(|id| MockBackend::new(id, "m").into_arc())
        .collect();
    let checker = checker(backends.clone(), Duration::from_secs(5));

    checker.check_all().await;
    checker.check_all().await;

    for backend in &backends {
        assert_eq!(backend.health_calls(), 2);
        assert_eq!(backend.generate_calls(), 0);
    }
}
