//! Application configuration
//!
//! Configuration is assembled once at startup and shared read-only through
//! [`AppState`](crate::state::AppState). Sources, lowest priority first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. `config/default.toml` (optional)
//! 3. `config/{APP_ENV}.toml` (optional)
//! 4. Environment variables prefixed `APP__`, nested with `__`
//!    (e.g. `APP__SERVER__PORT=8080`, `APP__RESPONSE__UTC_OFFSET=+01:00`)
//!
//! Before any source is read, a dotenv file is loaded into the process
//! environment: the file named by `ENV_FILE`, else `.env.{APP_ENV}`, else `.env`.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

const ENV_PREFIX: &str = "APP";
const DEFAULT_ENVIRONMENT: &str = "local";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to read env file {path}: {message}")]
    EnvFile { path: String, message: String },

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub response: ResponseConfig,
}

/// Application identity, also used to render the OpenAPI document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    pub environment: String,
    pub version: String,
    pub description: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_url: Option<String>,
    pub license_name: String,
    pub license_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Envelope API".to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "API scaffold with uniform response envelopes, request-id tagging \
                          and centralized error translation."
                .to_string(),
            contact_name: None,
            contact_email: None,
            contact_url: None,
            license_name: "MIT License".to_string(),
            license_url: Some("https://opensource.org/licenses/MIT".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum accepted request body in bytes.
    pub max_request_body_size: usize,
    /// Allowed CORS origins. Empty disables CORS headers entirely.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_request_body_size: 10 * 1024 * 1024,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    pub file_enabled: bool,
    pub file_directory: String,
    pub file_prefix: String,
    /// One of `daily`, `hourly`, `minutely`, `never`.
    pub file_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_enabled: false,
            file_directory: "logs".to_string(),
            file_prefix: "envelope".to_string(),
            file_rotation: "daily".to_string(),
        }
    }
}

/// Settings consumed by the response normalization middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseConfig {
    /// Civil offset used for envelope timestamps, e.g. `+09:00`.
    pub utc_offset: String,
    pub success_message: String,
    pub failure_message: String,
    pub validation_message: String,
    /// Requests whose path starts with one of these bypass tagging and wrapping.
    pub exempt_path_prefixes: Vec<String>,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            utc_offset: "+09:00".to_string(),
            success_message: "success".to_string(),
            failure_message: "failure".to_string(),
            validation_message: "input validation failed".to_string(),
            exempt_path_prefixes: vec![
                "/docs".to_string(),
                "/redoc".to_string(),
                "/openapi".to_string(),
            ],
        }
    }
}

impl ResponseConfig {
    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt_path_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Timestamp offset; falls back to UTC when `utc_offset` does not parse
    /// (rejected earlier by [`Config::validate`]).
    pub fn offset(&self) -> FixedOffset {
        parse_utc_offset(&self.utc_offset).unwrap_or_else(|| Utc.fix())
    }

    pub fn message_for(&self, status: u16) -> &str {
        if status < 400 {
            &self.success_message
        } else {
            &self.failure_message
        }
    }
}

impl Config {
    /// Load configuration from dotenv files, optional TOML files and `APP__*`
    /// environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        load_env_file()?;

        let environment =
            std::env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string());

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Config::default())?)
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{environment}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .with_list_parse_key("response.exempt_path_prefixes"),
            )
            .set_override("app.environment", environment)?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid(
                "server.port must be between 1 and 65535".into(),
            ));
        }

        if self.server.max_request_body_size == 0 {
            return Err(ConfigError::Invalid(
                "server.max_request_body_size cannot be 0".into(),
            ));
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !matches!(
            level.as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            return Err(ConfigError::Invalid(format!(
                "logging.level must be one of trace, debug, info, warn, error (got `{}`)",
                self.logging.level
            )));
        }

        if !matches!(
            self.logging.file_rotation.as_str(),
            "daily" | "hourly" | "minutely" | "never"
        ) {
            return Err(ConfigError::Invalid(format!(
                "logging.file_rotation must be one of daily, hourly, minutely, never (got `{}`)",
                self.logging.file_rotation
            )));
        }

        if parse_utc_offset(&self.response.utc_offset).is_none() {
            return Err(ConfigError::Invalid(format!(
                "response.utc_offset `{}` is not a valid offset like +09:00",
                self.response.utc_offset
            )));
        }

        if self
            .response
            .exempt_path_prefixes
            .iter()
            .any(|p| p.is_empty() || !p.starts_with('/'))
        {
            return Err(ConfigError::Invalid(
                "response.exempt_path_prefixes entries must start with `/`".into(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| {
                ConfigError::Invalid(format!(
                    "invalid listen address {}:{}: {e}",
                    self.server.host, self.server.port
                ))
            })
    }
}

/// Load the dotenv file for the current environment into the process env.
///
/// Returns the loaded path, or `None` when no file exists.
fn load_env_file() -> Result<Option<PathBuf>, ConfigError> {
    let result = match std::env::var("ENV_FILE") {
        Ok(path) => dotenvy::from_filename(path),
        Err(_) => {
            let environment =
                std::env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string());
            match dotenvy::from_filename(format!(".env.{environment}")) {
                Err(e) if e.not_found() => dotenvy::dotenv(),
                other => other,
            }
        }
    };

    match result {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(ConfigError::EnvFile {
            path: std::env::var("ENV_FILE").unwrap_or_else(|_| ".env".to_string()),
            message: e.to_string(),
        }),
    }
}

/// Parse `Z`, `+HH`, `+HHMM` or `+HH:MM` (sign required otherwise).
pub fn parse_utc_offset(value: &str) -> Option<FixedOffset> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match value.as_bytes().first()? {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => return None,
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };

    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
