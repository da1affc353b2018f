//! Configuration module for the zoo records backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::fmt;
use std::net::SocketAddr;

use crate::errors::ErrorReporting;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage connection string
    pub database_url: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Maximum number of pooled storage connections
    pub max_connections: u32,
    /// How failures are reported to callers
    pub error_reporting: ErrorReporting,
}

/// A configuration variable held a value that could not be parsed.
#[derive(Debug)]
pub struct ConfigError {
    pub variable: &'static str,
    pub value: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value {:?} for {}", self.value, self.variable)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url = env::var("ZOO_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./data/zoo.sqlite?mode=rwc".to_string());

        let bind_addr =
            parse_var::<SocketAddr>("ZOO_BIND_ADDR", "0.0.0.0:8080", |v| v.parse().ok())?;

        let log_level = env::var("ZOO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = parse_var("ZOO_LOG_FORMAT", "text", |v| {
            match v.to_ascii_lowercase().as_str() {
                "text" => Some(LogFormat::Text),
                "json" => Some(LogFormat::Json),
                _ => None,
            }
        })?;

        let max_connections = parse_var("ZOO_DB_MAX_CONNECTIONS", "5", |v| {
            v.parse::<u32>().ok().filter(|n| *n > 0)
        })?;

        let distinct = parse_var("ZOO_DISTINCT_ERRORS", "false", parse_bool)?;
        let error_reporting = if distinct {
            ErrorReporting::Distinct
        } else {
            ErrorReporting::Generic
        };

        Ok(Self {
            database_url,
            bind_addr,
            log_level,
            log_format,
            max_connections,
            error_reporting,
        })
    }
}

fn parse_var<T>(
    variable: &'static str,
    default: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, ConfigError> {
    let value = env::var(variable).unwrap_or_else(|_| default.to_string());
    parse(value.trim()).ok_or(ConfigError { variable, value })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
