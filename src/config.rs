//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;
    pub const DEV_BACKEND_URL: &str = "http://localhost:8000";
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Settings for outbound requests to the content backend.
#[derive(Debug, Clone)]
pub struct BackendSettings {
    /// Base URL of the content API, without a trailing slash
    pub base_url: String,
    /// Optional connect timeout; `None` keeps the HTTP client default
    pub connect_timeout: Option<Duration>,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory holding the built dashboard assets
    pub static_dir: Option<PathBuf>,
    /// Content backend settings
    pub backend: BackendSettings,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `DOCDESK_HOST`: Server host (default: 127.0.0.1)
    /// - `DOCDESK_PORT`: Server port (default: 8080)
    /// - `DOCDESK_BACKEND_URL`: Content API base URL (required in production)
    /// - `DOCDESK_STATIC_DIR`: Built dashboard assets
    /// - `DOCDESK_UPSTREAM_CONNECT_TIMEOUT_SECS`: Connect timeout for backend requests
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("DOCDESK_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = env::var("DOCDESK_PORT")
            .unwrap_or_else(|_| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("DOCDESK_PORT must be a valid port number"))?;

        let base_url = env::var("DOCDESK_BACKEND_URL")
            .unwrap_or_else(|_| defaults::DEV_BACKEND_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let connect_timeout = match env::var("DOCDESK_UPSTREAM_CONNECT_TIMEOUT_SECS") {
            Ok(raw) => Some(Duration::from_secs(raw.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue(
                    "DOCDESK_UPSTREAM_CONNECT_TIMEOUT_SECS must be a valid number",
                )
            })?)),
            Err(_) => None,
        };

        let static_dir = env::var("DOCDESK_STATIC_DIR").ok().map(PathBuf::from);

        let config = Config {
            environment,
            host,
            port,
            static_dir,
            backend: BackendSettings {
                base_url,
                connect_timeout,
            },
        };

        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.backend.base_url == defaults::DEV_BACKEND_URL {
            errors.push(format!(
                "DOCDESK_BACKEND_URL is using development default '{}'. Set the production content API URL.",
                defaults::DEV_BACKEND_URL
            ));
        }

        if self.backend.base_url.is_empty() {
            errors.push("DOCDESK_BACKEND_URL must not be empty.".to_string());
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
