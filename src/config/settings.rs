//! Application settings and configuration management

use crate::backend::BackendId;
use crate::error::{AppError, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default = "default_priority")]
    pub priority: Vec<BackendId>,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// Per-call ceilings for outbound provider calls
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_generate_timeout")]
    pub generate_secs: u64,
    #[serde(default = "default_health_timeout")]
    pub health_secs: u64,
}

fn default_generate_timeout() -> u64 {
    30
}

fn default_health_timeout() -> u64 {
    5
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            generate_secs: default_generate_timeout(),
            health_secs: default_health_timeout(),
        }
    }
}

/// Connection settings for one provider
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl ProviderConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: None,
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// The credential, if one is set and non-empty
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Connection settings for every provider
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ProvidersConfig {
    pub lmstudio: ProviderConfig,
    pub groq: ProviderConfig,
    pub gemini: ProviderConfig,
    pub openrouter: ProviderConfig,
}

impl ProvidersConfig {
    pub fn get(&self, id: BackendId) -> &ProviderConfig {
        match id {
            BackendId::LmStudio => &self.lmstudio,
            BackendId::Groq => &self.groq,
            BackendId::Gemini => &self.gemini,
            BackendId::OpenRouter => &self.openrouter,
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            lmstudio: ProviderConfig::new("http://localhost:1234/v1", "local-model"),
            groq: ProviderConfig::new(
                "https://api.groq.com/openai/v1",
                "llama-3.1-70b-versatile",
            ),
            gemini: ProviderConfig::new(
                "https://generativelanguage.googleapis.com/v1beta",
                "gemini-1.5-flash",
            ),
            openrouter: ProviderConfig::new(
                "https://openrouter.ai/api/v1",
                "anthropic/claude-3.5-sonnet",
            ),
        }
    }
}

/// Local first, then cheap and fast, then quality, then the most flexible
fn default_priority() -> Vec<BackendId> {
    vec![
        BackendId::LmStudio,
        BackendId::Groq,
        BackendId::Gemini,
        BackendId::OpenRouter,
    ]
}

/// Provider environment variables and the settings keys they override
const PROVIDER_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("LMSTUDIO_URL", "providers.lmstudio.base_url"),
    ("LMSTUDIO_MODEL", "providers.lmstudio.model"),
    ("GROQ_API_KEY", "providers.groq.api_key"),
    ("GROQ_BASE_URL", "providers.groq.base_url"),
    ("GROQ_MODEL", "providers.groq.model"),
    ("GEMINI_API_KEY", "providers.gemini.api_key"),
    ("GEMINI_BASE_URL", "providers.gemini.base_url"),
    ("GEMINI_MODEL", "providers.gemini.model"),
    ("OPENROUTER_API_KEY", "providers.openrouter.api_key"),
    ("OPENROUTER_BASE_URL", "providers.openrouter.base_url"),
    ("OPENROUTER_MODEL", "providers.openrouter.model"),
];

impl Settings {
    /// Load settings from the configuration file and process environment
    pub fn load() -> Result<Self> {
        let path = std::env::var("LLM_GATEWAY_CONFIG")
            .unwrap_or_else(|_| "config/gateway.yaml".to_string());
        Self::load_from_path(path)
    }

    /// Load settings from a specific YAML file plus the process environment
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::load_with_env(path, &vars)
    }

    /// Load settings from a YAML file and an explicit set of environment variables
    pub fn load_with_env<P: AsRef<Path>>(path: P, vars: &HashMap<String, String>) -> Result<Self> {
        let path = path.as_ref();

        let mut builder = Self::defaults()?;

        if path.exists() {
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml));
        }

        builder = builder.add_source(
            Environment::with_prefix("LLM_GATEWAY")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("priority")
                .try_parsing(true)
                .source(Some(vars.clone().into_iter().collect())),
        );

        for (var, key) in PROVIDER_ENV_OVERRIDES {
            builder = builder.set_override_option(*key, vars.get(*var).cloned())?;
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>> {
        let providers = ProvidersConfig::default();

        let mut builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            .set_default("timeouts.generate_secs", default_generate_timeout())?
            .set_default("timeouts.health_secs", default_health_timeout())?
            .set_default(
                "priority",
                default_priority()
                    .iter()
                    .map(|id| id.as_str().to_string())
                    .collect::<Vec<_>>(),
            )?;

        for id in BackendId::ALL {
            let provider = providers.get(id);
            builder = builder
                .set_default(format!("providers.{}.base_url", id), provider.base_url.clone())?
                .set_default(format!("providers.{}.model", id), provider.model.clone())?;
        }

        Ok(builder)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Server port cannot be 0".to_string(),
            )));
        }

        if self.timeouts.generate_secs == 0 || self.timeouts.health_secs == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Timeouts must be at least one second".to_string(),
            )));
        }

        validate_priority(&self.priority, &BackendId::ALL)
    }
}

/// Check that `priority` names every registered backend exactly once
pub fn validate_priority(priority: &[BackendId], registered: &[BackendId]) -> Result<()> {
    for id in registered {
        match priority.iter().filter(|p| *p == id).count() {
            1 => {}
            0 => {
                return Err(AppError::InvalidPriority(format!(
                    "provider '{}' is missing",
                    id
                )))
            }
            _ => {
                return Err(AppError::InvalidPriority(format!(
                    "provider '{}' is listed more than once",
                    id
                )))
            }
        }
    }

    if let Some(unknown) = priority.iter().find(|p| !registered.contains(p)) {
        return Err(AppError::InvalidPriority(format!(
            "provider '{}' is not registered",
            unknown
        )));
    }

    Ok(())
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
            timeouts: TimeoutConfig::default(),
            priority: default_priority(),
            providers: ProvidersConfig::default(),
        }
    }
}
