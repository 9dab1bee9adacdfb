//! Host configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `POLICY_PORT` | 9443 |
//! | `HEALTH_PORT` | 8080 |
//! | `POLICY_TLS_CERT` | `/etc/webhook/certs/tls.crt` |
//! | `POLICY_TLS_KEY` | `/etc/webhook/certs/tls.key` |

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Default path to the TLS certificate
pub const DEFAULT_TLS_CERT_PATH: &str = "/etc/webhook/certs/tls.crt";
/// Default path to the TLS private key
pub const DEFAULT_TLS_KEY_PATH: &str = "/etc/webhook/certs/tls.key";
/// Default policy server port
pub const DEFAULT_POLICY_PORT: u16 = 9443;
/// Default health server port
pub const DEFAULT_HEALTH_PORT: u16 = 8080;

/// Errors raised while reading the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {source}")]
    InvalidPort {
        key: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Configuration of the policy host
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Port serving the policy endpoints
    pub port: u16,
    /// Port serving probes and metrics
    pub health_port: u16,
    /// TLS certificate (PEM)
    pub cert_path: PathBuf,
    /// TLS private key (PEM)
    pub key_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_POLICY_PORT,
            health_port: DEFAULT_HEALTH_PORT,
            cert_path: PathBuf::from(DEFAULT_TLS_CERT_PATH),
            key_path: PathBuf::from(DEFAULT_TLS_KEY_PATH),
        }
    }
}

impl ServerConfig {
    /// Read the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            port: port(&lookup, "POLICY_PORT", defaults.port)?,
            health_port: port(&lookup, "HEALTH_PORT", defaults.health_port)?,
            cert_path: lookup("POLICY_TLS_CERT")
                .map(PathBuf::from)
                .unwrap_or(defaults.cert_path),
            key_path: lookup("POLICY_TLS_KEY")
                .map(PathBuf::from)
                .unwrap_or(defaults.key_path),
        })
    }

    /// Whether both TLS files are present
    pub fn tls_enabled(&self) -> bool {
        self.cert_path.exists() && self.key_path.exists()
    }
}

fn port<F>(lookup: &F, key: &'static str, default: u16) -> Result<u16, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => {
            let parsed = value.trim().parse::<u16>();
            parsed.map_err(|source| ConfigError::InvalidPort { key, value, source })
        }
        None => Ok(default),
    }
}
