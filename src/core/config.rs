use secrecy::{ExposeSecret, Secret};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::env;

/// Production REST endpoint root. The API version segment is appended per
/// request, so this ends at `/api`.
pub const DEFAULT_BASE_URL: &str = "https://api.binance.com/api";

/// API version segment placed between the base URL and the endpoint path.
pub const DEFAULT_API_VERSION: &str = "v3";

/// Default staleness tolerance for signed requests, in milliseconds.
pub const DEFAULT_RECV_WINDOW_MS: u64 = 5000;

/// Default transport timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone)]
pub struct BinanceConfig {
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    pub base_url: Option<String>,
    pub api_version: String,
    pub recv_window_ms: u64,
    pub verify_tls: bool,
    pub timeout_seconds: u64,
}

// Never expose secrets in serialized form.
impl Serialize for BinanceConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("BinanceConfig", 7)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("api_version", &self.api_version)?;
        state.serialize_field("recv_window_ms", &self.recv_window_ms)?;
        state.serialize_field("verify_tls", &self.verify_tls)?;
        state.serialize_field("timeout_seconds", &self.timeout_seconds)?;
        state.end()
    }
}

impl BinanceConfig {
    /// Create a new configuration with API credentials.
    #[must_use]
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            base_url: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            recv_window_ms: DEFAULT_RECV_WINDOW_MS,
            verify_tls: true,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Configuration without credentials, for public market-data endpoints.
    /// Signed calls against a read-only configuration fail with an
    /// authentication error.
    #[must_use]
    pub fn read_only() -> Self {
        Self::new(String::new(), String::new())
    }

    /// Create configuration from environment variables.
    ///
    /// Required:
    /// - `BINANCE_API_KEY`
    /// - `BINANCE_API_SECRET`
    ///
    /// Optional:
    /// - `BINANCE_BASE_URL`
    /// - `BINANCE_RECV_WINDOW` (milliseconds)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("BINANCE_API_KEY")
            .map_err(|_| ConfigError::MissingEnvironmentVariable("BINANCE_API_KEY".to_string()))?;
        let secret_key = env::var("BINANCE_API_SECRET").map_err(|_| {
            ConfigError::MissingEnvironmentVariable("BINANCE_API_SECRET".to_string())
        })?;

        let mut config = Self::new(api_key, secret_key);

        if let Ok(base_url) = env::var("BINANCE_BASE_URL") {
            config.base_url = Some(base_url);
        }
        if let Ok(recv_window) = env::var("BINANCE_RECV_WINDOW") {
            config.recv_window_ms = recv_window.parse().map_err(|_| {
                ConfigError::InvalidConfiguration(format!(
                    "BINANCE_RECV_WINDOW must be an integer, got '{recv_window}'"
                ))
            })?;
        }

        Ok(config)
    }

    /// Create configuration from a `.env` file and environment variables.
    ///
    /// **Security warning**: never commit `.env` files to version control.
    #[cfg(feature = "env-file")]
    pub fn from_env_file() -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(".env")
    }

    /// Create configuration from a specific `.env` file path.
    ///
    /// A missing file is not an error; the process environment is used as-is.
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "failed to load .env file '{env_file_path}': {e}"
                )));
            }
        }

        Self::from_env()
    }

    /// Check whether this configuration can sign private requests.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.secret_key.expose_secret().is_empty()
    }

    /// Override the REST endpoint root.
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Override the API version segment.
    #[must_use]
    pub fn api_version(mut self, api_version: String) -> Self {
        self.api_version = api_version;
        self
    }

    /// Override the signed-request staleness tolerance.
    #[must_use]
    pub const fn recv_window_ms(mut self, recv_window_ms: u64) -> Self {
        self.recv_window_ms = recv_window_ms;
        self
    }

    /// Disable TLS certificate verification. Only useful against local
    /// test doubles.
    #[must_use]
    pub const fn verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    /// Override the transport timeout.
    #[must_use]
    pub const fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Get API key (use carefully - exposes secret).
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get secret key (use carefully - exposes secret).
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }

    /// REST endpoint root, falling back to the production default.
    pub fn rest_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_exchange_conventions() {
        let config = BinanceConfig::new("key".to_string(), "secret".to_string());
        assert_eq!(config.rest_base_url(), "https://api.binance.com/api");
        assert_eq!(config.api_version, "v3");
        assert_eq!(config.recv_window_ms, 5000);
        assert!(config.verify_tls);
        assert_eq!(config.timeout_seconds, 20);
        assert!(config.has_credentials());
    }

    #[test]
    fn read_only_has_no_credentials() {
        assert!(!BinanceConfig::read_only().has_credentials());
    }

    #[test]
    fn builder_setters_override_defaults() {
        let config = BinanceConfig::read_only()
            .base_url("http://localhost:9000/api".to_string())
            .recv_window_ms(10_000)
            .verify_tls(false);
        assert_eq!(config.rest_base_url(), "http://localhost:9000/api");
        assert_eq!(config.recv_window_ms, 10_000);
        assert!(!config.verify_tls);
    }

    #[test]
    fn serialization_redacts_secrets() {
        let config = BinanceConfig::new("live-key".to_string(), "live-secret".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("live-key"));
        assert!(!json.contains("live-secret"));
        assert!(json.contains("[REDACTED]"));
    }
}
