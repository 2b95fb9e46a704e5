// Centralized configuration management for the welcome modal backend
// Load ALL env vars ONCE at startup, refuse to start when required ones are absent

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Scopes requested during the install handshake when `SCOPES` is unset
pub const DEFAULT_SCOPES: &[&str] = &["write_script_tags", "read_themes"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub shopify: ShopifyConfig,
    pub database: DatabaseConfig,
    pub admission: AdmissionStrategy,
    pub cors_allowed_origins: Vec<String>,
    pub disable_embedded_migrations: bool,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub environment: Environment,
}

/// Environment type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Shopify app credentials and handshake parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifyConfig {
    pub api_key: String,
    pub api_secret: String,
    pub scopes: Vec<String>,
    /// Public host name of this app without scheme, e.g. `modal.example.com`
    pub host_name: String,
}

impl ShopifyConfig {
    /// Public origin the storefront script and OAuth redirect point at
    pub fn app_origin(&self) -> String {
        format!("https://{}", self.host_name)
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: u64,
    pub idle_timeout: u64,
    pub max_lifetime: u64,
}

/// How write requests to the settings API are admitted.
/// Exactly one strategy is active per deployment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AdmissionStrategy {
    /// `x-shopify-hmac-sha256` over the raw request body
    Signature,
    /// Session established by a completed OAuth handshake
    Session,
}

impl std::str::FromStr for AdmissionStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "signature" | "hmac" => Ok(AdmissionStrategy::Signature),
            "session" | "oauth" => Ok(AdmissionStrategy::Session),
            other => Err(ConfigError::InvalidValue(
                "ADMISSION_STRATEGY".to_string(),
                format!("expected 'signature' or 'session', got '{}'", other),
            )),
        }
    }
}

impl std::fmt::Display for AdmissionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdmissionStrategy::Signature => write!(f, "signature"),
            AdmissionStrategy::Session => write!(f, "session"),
        }
    }
}

/// Strip `http://` or `https://` and any trailing slash from a host value
pub fn strip_scheme(host: &str) -> String {
    let trimmed = host.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    without_scheme.trim_end_matches('/').to_string()
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Helper function to get required env var
        let get_required = |key: &str| -> Result<String, ConfigError> {
            match env::var(key) {
                Ok(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(ConfigError::MissingVar(key.to_string())),
            }
        };

        // Helper function to get optional env var with default
        let get_or_default = |key: &str, default: &str| -> String {
            env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let parse_or_default = |key: &str, default: &str| -> Result<u32, ConfigError> {
            get_or_default(key, default).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u32".to_string())
            })
        };

        let parse_u64_or_default = |key: &str, default: &str| -> Result<u64, ConfigError> {
            get_or_default(key, default).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u64".to_string())
            })
        };

        let parse_bool_or_default = |key: &str, default: &str| -> bool {
            get_or_default(key, default).to_lowercase() == "true"
        };

        // Required values first so a misconfigured process fails before anything else
        let api_key = get_required("SHOPIFY_API_KEY")?;
        let api_secret = get_required("SHOPIFY_API_SECRET")?;
        let host = get_required("HOST")?;
        let database_url = get_required("DATABASE_URL")?;

        let host_name = strip_scheme(&host);
        if host_name.is_empty() {
            return Err(ConfigError::InvalidValue(
                "HOST".to_string(),
                "host name cannot be empty".to_string(),
            ));
        }

        let scopes: Vec<String> = match env::var("SCOPES") {
            Ok(raw) if !raw.trim().is_empty() => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            _ => DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
        };

        // PORT wins over the port in BIND_ADDRESS, matching common PaaS conventions
        let mut bind_address = get_or_default("BIND_ADDRESS", "0.0.0.0:3000");
        if let Ok(port) = env::var("PORT") {
            let host_part = bind_address
                .rsplit_once(':')
                .map(|(h, _)| h.to_string())
                .unwrap_or_else(|| "0.0.0.0".to_string());
            bind_address = format!("{}:{}", host_part, port);
        }
        let port = bind_address
            .rsplit(':')
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(|| {
                ConfigError::InvalidValue("BIND_ADDRESS".to_string(), bind_address.clone())
            })?;

        let environment = Environment::from(get_or_default("ENVIRONMENT", "development"));

        let admission = get_or_default("ADMISSION_STRATEGY", "signature").parse()?;

        let database = DatabaseConfig {
            url: database_url,
            max_connections: parse_or_default("DATABASE_MAX_CONNECTIONS", "10")?,
            min_connections: parse_or_default("DATABASE_MIN_CONNECTIONS", "1")?,
            connect_timeout: parse_u64_or_default("DATABASE_CONNECT_TIMEOUT", "30")?,
            idle_timeout: parse_u64_or_default("DATABASE_IDLE_TIMEOUT", "600")?,
            max_lifetime: parse_u64_or_default("DATABASE_MAX_LIFETIME", "1800")?,
        };

        if database.max_connections == 0 || database.max_connections < database.min_connections
        {
            return Err(ConfigError::InvalidValue(
                "DATABASE_MAX_CONNECTIONS".to_string(),
                "must be > 0 and >= DATABASE_MIN_CONNECTIONS".to_string(),
            ));
        }

        let cors_allowed_origins: Vec<String> = get_or_default("CORS_ALLOWED_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            server: ServerConfig {
                bind_address,
                port,
                environment,
            },
            shopify: ShopifyConfig {
                api_key,
                api_secret,
                scopes,
                host_name,
            },
            database,
            admission,
            cors_allowed_origins,
            disable_embedded_migrations: parse_bool_or_default(
                "DISABLE_EMBEDDED_MIGRATIONS",
                "false",
            ),
        })
    }
}
