//! Application configuration
//!
//! Loaded from optional `config/default` and `config/local` files plus
//! `APP__`-prefixed environment variables.

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, DatabaseConfig, LogFormat, LoggingConfig, ServerConfig,
};
