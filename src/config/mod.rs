use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::tracker::{SharePolicy, MAX_SHARE_TTL_HOURS};

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub sharing: SharingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let sharing = SharingConfig {
            default_ttl_hours: hours_var("APP_SHARE_TTL_HOURS", 72)?,
            max_ttl_hours: hours_var("APP_SHARE_MAX_TTL_HOURS", 720)?,
        };
        sharing.validate()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            sharing,
        })
    }
}

fn hours_var(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidShareTtl { var: name }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
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
}

/// Lifetime bounds for clinician share links, in hours.
#[derive(Debug, Clone, Copy)]
pub struct SharingConfig {
    pub default_ttl_hours: i64,
    pub max_ttl_hours: i64,
}

impl SharingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_ttl_hours < 1 || self.max_ttl_hours < 1 {
            return Err(ConfigError::InvalidShareTtl {
                var: "APP_SHARE_TTL_HOURS",
            });
        }
        if self.default_ttl_hours > self.max_ttl_hours
            || self.max_ttl_hours > MAX_SHARE_TTL_HOURS
        {
            return Err(ConfigError::InvalidShareTtl {
                var: "APP_SHARE_MAX_TTL_HOURS",
            });
        }
        Ok(())
    }

    pub fn policy(&self) -> SharePolicy {
        SharePolicy {
            default_ttl_hours: self.default_ttl_hours,
            max_ttl_hours: self.max_ttl_hours,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidShareTtl { var: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidShareTtl { var } => write!(
                f,
                "{var} must be a positive number of hours, with the default no larger than the max \
                 and the max no larger than {MAX_SHARE_TTL_HOURS}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidShareTtl { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
