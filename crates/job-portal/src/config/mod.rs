use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use axum::http::HeaderValue;

use crate::store::StoreLocation;

const DEVELOPMENT_JWT_SECRET: &str = "job-portal-development-secret";
const TOKEN_TTL_DAYS: i64 = 2;
const DEFAULT_BCRYPT_COST: u32 = 10;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub database: DatabaseConfig,
    pub uploads: UploadConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Reads `.env` (when present) and then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment =
            AppEnvironment::from_str(&lookup("APP_ENV").unwrap_or_else(|| "development".into()));

        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("APP_PORT")
            .or_else(|| lookup("PORT"))
            .unwrap_or_else(|| "3000".to_string())
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let frontend_origin =
            lookup("FRONTEND_ORIGIN").unwrap_or_else(|| "http://localhost:5173".to_string());
        if HeaderValue::from_str(&frontend_origin).is_err() {
            return Err(ConfigError::InvalidOrigin {
                value: frontend_origin,
            });
        }

        let log_level = lookup("APP_LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let log_format = LogFormat::from_str(&lookup("APP_LOG_FORMAT").unwrap_or_default());

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| "memory://".to_string());
        let location = StoreLocation::parse(&database_url).ok_or_else(|| {
            ConfigError::InvalidDatabaseUrl {
                value: database_url.clone(),
            }
        })?;

        let upload_dir = lookup("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string());

        let jwt_secret = match lookup("JWT_SECRET").filter(|secret| !secret.trim().is_empty()) {
            Some(secret) => secret,
            None if environment == AppEnvironment::Production => {
                return Err(ConfigError::MissingJwtSecret)
            }
            None => DEVELOPMENT_JWT_SECRET.to_string(),
        };
        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|cost| (4..=31).contains(cost))
                .ok_or(ConfigError::InvalidBcryptCost { value: raw })?,
            None => DEFAULT_BCRYPT_COST,
        };

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                frontend_origin,
            },
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
            database: DatabaseConfig { location },
            uploads: UploadConfig {
                directory: PathBuf::from(upload_dir),
            },
            auth: AuthConfig {
                jwt_secret,
                token_ttl: chrono::Duration::days(TOKEN_TTL_DAYS),
                bcrypt_cost,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// The single origin allowed by CORS.
    pub frontend_origin: String,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Where the document store keeps its collections.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub location: StoreLocation,
}

/// Content directory for uploaded resumes.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub directory: PathBuf,
}

/// Token signing and password hashing parameters.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub bcrypt_cost: u32,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidOrigin { value: String },
    InvalidDatabaseUrl { value: String },
    InvalidBcryptCost { value: String },
    MissingJwtSecret,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16 port number"),
            ConfigError::InvalidHost { source } => {
                write!(f, "APP_HOST must be an IP address or 'localhost': {source}")
            }
            ConfigError::InvalidOrigin { value } => {
                write!(f, "FRONTEND_ORIGIN '{value}' is not a valid header value")
            }
            ConfigError::InvalidDatabaseUrl { value } => write!(
                f,
                "DATABASE_URL '{value}' must be 'memory://' or 'file://<directory>'"
            ),
            ConfigError::InvalidBcryptCost { value } => {
                write!(f, "BCRYPT_COST '{value}' must be an integer between 4 and 31")
            }
            ConfigError::MissingJwtSecret => {
                write!(f, "JWT_SECRET must be set when APP_ENV is production")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidOrigin { .. }
            | ConfigError::InvalidDatabaseUrl { .. }
            | ConfigError::InvalidBcryptCost { .. }
            | ConfigError::MissingJwtSecret => None,
        }
    }
}
