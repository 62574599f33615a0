//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional (all have defaults suitable for local development)
//! - `ENTRE_NOUS_HOST` - Bind address (default: 127.0.0.1)
//! - `ENTRE_NOUS_PORT` - Listen port (default: 3001)
//! - `ENTRE_NOUS_DATA_DIR` - Directory for the JSON documents (default: data)
//! - `ENTRE_NOUS_UPLOADS_DIR` - Directory for uploaded images (default: uploads)
//! - `ENTRE_NOUS_FRONTEND_URL` - Public storefront URL, used to resolve
//!   absolute links in notification emails (default: <http://localhost:3000>)
//! - `ENTRE_NOUS_BACKEND_URL` - Public URL of this server, used to resolve
//!   uploaded image links in notification emails (default: <http://localhost:3001>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//!
//! ## SMTP (notifications are disabled unless `SMTP_HOST` is set)
//! - `SMTP_HOST` - SMTP server hostname
//! - `SMTP_PORT` - SMTP server port (default: 587)
//! - `SMTP_USERNAME` - SMTP authentication username
//! - `SMTP_PASSWORD` - SMTP authentication password
//! - `SMTP_FROM_ADDRESS` - Sender address for notification emails

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the flat JSON documents
    pub data_dir: PathBuf,
    /// Directory holding uploaded product images (served at `/uploads`)
    pub uploads_dir: PathBuf,
    /// Public base URL for the storefront frontend
    pub frontend_url: String,
    /// Public base URL for this backend
    pub backend_url: String,
    /// SMTP configuration; `None` disables notification emails
    pub email: Option<EmailConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// SMTP transport configuration for notification emails.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP authentication username
    pub smtp_username: String,
    /// SMTP authentication password
    pub smtp_password: SecretString,
    /// Email sender address (From header)
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if the
    /// SMTP block is partially configured.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ENTRE_NOUS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ENTRE_NOUS_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("ENTRE_NOUS_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ENTRE_NOUS_PORT".to_string(), e.to_string())
            })?;
        let data_dir = PathBuf::from(get_env_or_default("ENTRE_NOUS_DATA_DIR", "data"));
        let uploads_dir = PathBuf::from(get_env_or_default("ENTRE_NOUS_UPLOADS_DIR", "uploads"));
        let frontend_url =
            get_env_or_default("ENTRE_NOUS_FRONTEND_URL", "http://localhost:3000");
        let backend_url = get_env_or_default("ENTRE_NOUS_BACKEND_URL", "http://localhost:3001");
        let email = EmailConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            data_dir,
            uploads_dir,
            frontend_url,
            backend_url,
            email,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl EmailConfig {
    /// Load the SMTP block, returning `None` when `SMTP_HOST` is unset.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(smtp_host) = get_optional_env("SMTP_HOST") else {
            return Ok(None);
        };

        let smtp_port = get_env_or_default("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string()))?;

        Ok(Some(Self {
            smtp_host,
            smtp_port,
            smtp_username: get_required_env("SMTP_USERNAME")?,
            smtp_password: SecretString::from(get_required_env("SMTP_PASSWORD")?),
            from_address: get_required_env("SMTP_FROM_ADDRESS")?,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            data_dir: PathBuf::from("data"),
            uploads_dir: PathBuf::from("uploads"),
            frontend_url: "http://localhost:3000".to_string(),
            backend_url: "http://localhost:3001".to_string(),
            email: None,
            sentry_dsn: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3001);
    }

    #[test]
    fn test_email_config_debug_redacts_password() {
        let config = EmailConfig {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            smtp_username: "shop@example.com".to_string(),
            smtp_password: SecretString::from("super_secret_password"),
            from_address: "Entre Nous <shop@example.com>".to_string(),
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("smtp.gmail.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_password"));
    }
}
