//! Unit tests for configuration module

use llm_gateway::backend::BackendId;
use llm_gateway::config::Settings;
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;
use tokio_test::{assert_err, assert_ok};

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn default_priority() -> Vec<BackendId> {
    vec![
        BackendId::LmStudio,
        BackendId::Groq,
        BackendId::Gemini,
        BackendId::OpenRouter,
    ]
}

fn yaml_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_default_settings() {
    let settings = Settings::default();

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 8000);
    assert_eq!(settings.logging.level, "info");
    assert_eq!(settings.priority, default_priority());
    assert_eq!(settings.providers.groq.model, "llama-3.1-70b-versatile");
    assert_eq!(settings.providers.lmstudio.base_url, "http://localhost:1234/v1");
}

#[test]
fn test_load_without_file_uses_defaults() {
    let settings =
        Settings::load_with_env("does/not/exist.yaml", &HashMap::new()).unwrap();

    assert_eq!(settings.server.port, 8000);
    assert_eq!(settings.timeouts.generate_secs, 30);
    assert_eq!(settings.timeouts.health_secs, 5);
    assert_eq!(settings.priority, default_priority());
    assert!(settings.providers.groq.api_key.is_none());
    assert_eq!(settings.providers.gemini.model, "gemini-1.5-flash");
}

#[test]
fn test_load_from_yaml_file() {
    let file = yaml_file(
        r#"
server:
  port: 9100
priority: [groq, lmstudio, openrouter, gemini]
providers:
  groq:
    model: llama-3.1-8b-instant
"#,
    );

    let settings = Settings::load_with_env(file.path(), &HashMap::new()).unwrap();

    assert_eq!(settings.server.port, 9100);
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(
        settings.priority,
        vec![
            BackendId::Groq,
            BackendId::LmStudio,
            BackendId::OpenRouter,
            BackendId::Gemini,
        ]
    );
    assert_eq!(settings.providers.groq.model, "llama-3.1-8b-instant");
    assert_eq!(settings.providers.groq.base_url, "https://api.groq.com/openai/v1");
}

#[test]
fn test_provider_environment_variables() {
    let vars = env(&[
        ("GROQ_API_KEY", "gsk_test"),
        ("GEMINI_MODEL", "gemini-1.5-pro"),
        ("LMSTUDIO_URL", "http://10.0.0.5:1234/v1"),
    ]);

    let settings = Settings::load_with_env("does/not/exist.yaml", &vars).unwrap();

    assert_eq!(settings.providers.groq.credential(), Some("gsk_test"));
    assert_eq!(settings.providers.gemini.model, "gemini-1.5-pro");
    assert_eq!(settings.providers.lmstudio.base_url, "http://10.0.0.5:1234/v1");
    assert!(settings.providers.openrouter.credential().is_none());
}

#[test]
fn test_prefixed_environment_overrides_file() {
    let file = yaml_file("server:\n  port: 9100\n");
    let vars = env(&[
        ("LLM_GATEWAY__SERVER__PORT", "9200"),
        ("LLM_GATEWAY__PRIORITY", "openrouter,gemini,groq,lmstudio"),
    ]);

    let settings = Settings::load_with_env(file.path(), &vars).unwrap();

    assert_eq!(settings.server.port, 9200);
    assert_eq!(settings.priority[0], BackendId::OpenRouter);
    assert_eq!(settings.priority[3], BackendId::LmStudio);
}

#[test]
fn test_priority_names_are_case_insensitive() {
    let file = yaml_file("priority: [Groq, LMSTUDIO, OpenRouter, gemini]\n");
    let settings = Settings::load_with_env(file.path(), &HashMap::new()).unwrap();

    assert_eq!(
        settings.priority,
        vec![
            BackendId::Groq,
            BackendId::LmStudio,
            BackendId::OpenRouter,
            BackendId::Gemini,
        ]
    );
}

#[test]
fn test_incomplete_priority_rejected() {
    let file = yaml_file("priority: [groq, gemini]\n");
    assert_err!(Settings::load_with_env(file.path(), &HashMap::new()));
}

#[test]
fn test_unknown_provider_in_priority_rejected() {
    let file = yaml_file("priority: [groq, gemini, lmstudio, openrouter, anthropic]\n");
    assert_err!(Settings::load_with_env(file.path(), &HashMap::new()));
}

#[test]
fn test_settings_validation() {
    let mut settings = Settings::default();
    assert_ok!(settings.validate());

    settings.server.port = 0;
    assert_err!(settings.validate());

    settings.server.port = 8000;
    settings.timeouts.health_secs = 0;
    assert_err!(settings.validate());
}
