//! Configuration module

pub mod settings;

pub use settings::{
    LoggingConfig, ProviderConfig, ProvidersConfig, ServerConfig, Settings, TimeoutConfig,
};
