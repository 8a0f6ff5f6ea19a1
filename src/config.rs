//! Configuration management for the Kayako client.
//!
//! This module handles loading configuration from environment variables,
//! with validation to ensure all required values are present.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::error::KayakoError;
use crate::logger::Logger;
use crate::service::ServiceConfig;
use crate::signer::Credentials;
use crate::transport::Transport;

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to a Kayako instance.
///
/// The API key and secret are kept in memory only; `Debug` redacts them.
#[derive(Clone)]
pub struct Config {
    /// Address of the REST endpoint (e.g., `https://helpdesk.example.com/api/index.php`).
    pub base_url: String,

    /// Public API key sent with every request.
    pub api_key: String,

    /// Shared secret used to sign requests. Never logged.
    pub secret_key: String,

    /// Timeout applied to every HTTP request.
    pub timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `KAYAKO_BASE_URL`: The REST endpoint of the Kayako instance
    /// - `KAYAKO_API_KEY`: The API key
    /// - `KAYAKO_SECRET_KEY`: The shared secret used for signing
    ///
    /// # Optional
    ///
    /// - `KAYAKO_TIMEOUT_SECS`: HTTP timeout in seconds (default 30)
    ///
    /// # Errors
    ///
    /// Returns `KayakoError::Config` if any required variable is missing
    /// or if values fail validation.
    pub fn from_env() -> Result<Self, KayakoError> {
        let base_url = Self::get_required_env("KAYAKO_BASE_URL")?;
        let api_key = Self::get_required_env("KAYAKO_API_KEY")?;
        let secret_key = Self::get_required_env("KAYAKO_SECRET_KEY")?;
        let timeout = Self::parse_timeout(env::var("KAYAKO_TIMEOUT_SECS").ok().as_deref())?;

        Self::new(base_url, api_key, secret_key, timeout)
    }

    /// Builds a validated configuration from explicit values.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, KayakoError> {
        let base_url = Self::validate_base_url(base_url.into())?;
        let api_key = api_key.into();
        let secret_key = secret_key.into();

        Self::validate_key("KAYAKO_API_KEY", &api_key)?;
        Self::validate_key("KAYAKO_SECRET_KEY", &secret_key)?;

        Ok(Config {
            base_url,
            api_key,
            secret_key,
            timeout,
        })
    }

    /// Returns the signing credentials.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.api_key, &self.secret_key)
    }

    /// Assembles the shared service configuration around a transport and logger.
    pub fn service_config(
        &self,
        transport: Arc<dyn Transport>,
        logger: Arc<dyn Logger>,
    ) -> ServiceConfig {
        ServiceConfig::new(transport, logger, &self.base_url, self.credentials())
    }

    /// Gets a required environment variable, returning an error if missing or empty.
    fn get_required_env(name: &str) -> Result<String, KayakoError> {
        env::var(name)
            .map_err(|_| KayakoError::missing_env(name))
            .and_then(|value| {
                if value.trim().is_empty() {
                    Err(KayakoError::missing_env(name))
                } else {
                    Ok(value)
                }
            })
    }

    fn parse_timeout(raw: Option<&str>) -> Result<Duration, KayakoError> {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        };
        match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(KayakoError::invalid_config(
                "KAYAKO_TIMEOUT_SECS must be a positive number of seconds",
            )),
        }
    }

    /// Validates and normalizes the base URL.
    pub(crate) fn validate_base_url(raw: String) -> Result<String, KayakoError> {
        let trimmed = raw.trim().trim_end_matches('/').to_string();

        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(KayakoError::invalid_config(
                "KAYAKO_BASE_URL must start with http:// or https://",
            ));
        }

        url::Url::parse(&trimmed)
            .map_err(|e| KayakoError::invalid_config(format!("invalid KAYAKO_BASE_URL: {}", e)))?;

        Ok(trimmed)
    }

    /// Validates a key is not empty or a placeholder value.
    fn validate_key(name: &str, key: &str) -> Result<(), KayakoError> {
        if key.trim().is_empty() {
            return Err(KayakoError::missing_env(name));
        }

        let key_lower = key.to_lowercase();
        let placeholder_patterns = ["your_api_key", "your_secret", "placeholder", "changeme"];

        for pattern in placeholder_patterns {
            if key_lower.contains(pattern) {
                return Err(KayakoError::invalid_config(format!(
                    "{} appears to be a placeholder value",
                    name
                )));
            }
        }

        Ok(())
    }
}
