//! HTTP listener settings: bind address, environment, log filter, CORS.

use http::HeaderValue;
use serde::Deserialize;
use std::net::SocketAddr;

use super::error::ValidationError;

/// Longest request timeout accepted, in seconds.
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Listener configuration for the REST and `/ws` router.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Selects JSON log output when set to `production`.
    #[serde(default)]
    pub environment: Environment,

    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Comma-separated browser origins allowed to call the API.
    ///
    /// Unset or blank allows any origin, which is what the dashboard uses
    /// during local development.
    pub cors_origins: Option<String>,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// Cross-origin policy derived from `cors_origins`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    AnyOrigin,
    Origins(Vec<HeaderValue>),
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ValidationError::InvalidAddress(self.host.clone()))
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Parse `cors_origins` into a policy.
    ///
    /// Each entry must be a bare `http://` or `https://` origin with no path.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidCorsOrigin` naming the first bad entry.
    pub fn cors_policy(&self) -> Result<CorsPolicy, ValidationError> {
        let raw = match self.cors_origins.as_deref().map(str::trim) {
            None | Some("") => return Ok(CorsPolicy::AnyOrigin),
            Some(raw) => raw,
        };

        raw.split(',')
            .map(|entry| parse_origin(entry.trim()))
            .collect::<Result<Vec<_>, _>>()
            .map(CorsPolicy::Origins)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        self.socket_addr()?;
        if self.request_timeout_secs == 0 || self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(ValidationError::InvalidTimeout);
        }
        self.cors_policy()?;
        Ok(())
    }
}

fn parse_origin(entry: &str) -> Result<HeaderValue, ValidationError> {
    let invalid = || ValidationError::InvalidCorsOrigin(entry.to_string());

    let authority = entry
        .strip_prefix("https://")
        .or_else(|| entry.strip_prefix("http://"))
        .ok_or_else(invalid)?;
    if authority.is_empty() || authority.contains('/') {
        return Err(invalid());
    }
    HeaderValue::from_str(entry).map_err(|_| invalid())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout(),
            cors_origins: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info,maitri=debug,tower_http=info".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
