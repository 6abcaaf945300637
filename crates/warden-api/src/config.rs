// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Service configuration.
//!
//! Configuration is read from a TOML file, then overridden from
//! `WARDEN_`-prefixed environment variables, then validated. The signing
//! secret is usually supplied through the environment so it never lands in a
//! config file checked into version control.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::auth::TokenConfig;

/// Environment variable carrying the base64-encoded signing secret.
pub const ENV_SECRET: &str = "WARDEN_AUTH_SECRET";
/// Environment variable overriding the listen host.
pub const ENV_HOST: &str = "WARDEN_HOST";
/// Environment variable overriding the listen port.
pub const ENV_PORT: &str = "WARDEN_PORT";

// =============================================================================
// ConfigError
// =============================================================================

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be parsed.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Path of the file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// The configuration is semantically invalid.
    #[error("invalid configuration: {message}")]
    Invalid {
        /// What is wrong.
        message: String,
    },
}

// =============================================================================
// AppConfig
// =============================================================================

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Listen host address.
    pub host: IpAddr,
    /// Listen port.
    pub port: u16,
    /// Request timeout.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Token configuration.
    pub auth: TokenConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8080,
            request_timeout: Duration::from_secs(30),
            auth: TokenConfig::default(),
        }
    }
}

impl AppConfig {
    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Loads configuration from `path`, applies environment overrides and
    /// validates the result.
    ///
    /// A missing file is not an error: defaults plus environment overrides
    /// make a complete configuration for containerized deployments.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `WARDEN_`-prefixed environment variable overrides.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(secret) = std::env::var(ENV_SECRET) {
            self.auth.secret = secret;
        }
        if let Ok(host) = std::env::var(ENV_HOST) {
            self.host = host.parse().map_err(|_| ConfigError::Invalid {
                message: format!("{ENV_HOST} is not a valid IP address: {host}"),
            })?;
        }
        if let Ok(port) = std::env::var(ENV_PORT) {
            self.port = port.parse().map_err(|_| ConfigError::Invalid {
                message: format!("{ENV_PORT} is not a valid port: {port}"),
            })?;
        }
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.auth
            .decoded_secret()
            .map_err(|e| ConfigError::Invalid {
                message: e.to_string(),
            })?;

        if self.auth.validity_ms == 0 {
            return Err(ConfigError::Invalid {
                message: "auth.validity_ms must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.socket_addr().port(), 8080);
        assert_eq!(config.auth.validity_ms, 3_600_000);
    }

    #[test]
    fn test_parse_toml() {
        let raw = format!(
            r#"
            host = "127.0.0.1"
            port = 9090
            request_timeout = "10s"

            [auth]
            secret = "{}"
            issuer = "warden-staging"
            audience = "staging-clients"
            validity_ms = 600000
            "#,
            BASE64.encode("0123456789abcdef0123456789abcdef")
        );

        let config: AppConfig = toml::from_str(&raw).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.auth.issuer, "warden-staging");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("bogus_field = 1");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_missing_secret() {
        let config = AppConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_short_secret() {
        let config = AppConfig {
            auth: TokenConfig::new(BASE64.encode("short")),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_validity() {
        let config = AppConfig {
            auth: TokenConfig::new(BASE64.encode("0123456789abcdef0123456789abcdef"))
                .with_validity_ms(0),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
