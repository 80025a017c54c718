//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to deprecated variable names with warning logs.

use std::path::PathBuf;

use chrono::Duration;

/// Default listen port
pub const DEFAULT_PORT: u16 = 32780;

/// Default session lifetime in hours
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Get an environment variable with fallback to a deprecated name
///
/// If the new variable name is set, returns its value.
/// If only the old (deprecated) variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Example
/// ```
/// use dalog::config::get_env_with_fallback;
///
/// let port = get_env_with_fallback("DALOG_PORT", "PORT");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Returns `default` if neither variable is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Data directory (`DALOG_DATA_DIR`, default `~/.dalog`)
///
/// Falls back to `./.dalog` when no home directory can be determined.
pub fn data_dir() -> PathBuf {
    if let Some(dir) = get_env_with_fallback("DALOG_DATA_DIR", "DATA_DIR") {
        return PathBuf::from(dir);
    }
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".dalog")
}

/// Database URL (`DALOG_DATABASE_URL`, default `sqlite:<data dir>/dalog.db`)
pub fn database_url() -> String {
    get_env_with_fallback("DALOG_DATABASE_URL", "DATABASE_URL")
        .unwrap_or_else(|| format!("sqlite:{}", data_dir().join("dalog.db").display()))
}

/// HTTP server bind configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Listen port
    pub port: u16,
}

impl ServerConfig {
    /// Load from `DALOG_HOST` / `DALOG_PORT`.
    pub fn from_env() -> Self {
        let host = get_env_with_fallback_or("DALOG_HOST", "HOST", "0.0.0.0");
        let port = get_env_with_fallback_parse("DALOG_PORT", "PORT", DEFAULT_PORT);
        Self { host, port }
    }

    /// Build from explicit CLI arguments.
    pub fn from_args(host: String, port: u16) -> Self {
        Self { host, port }
    }

    /// `host:port` string for the TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Session lifetime configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long a session (and its JWT) stays valid.
    pub ttl: Duration,
}

impl SessionConfig {
    /// Load from `DALOG_SESSION_TTL_HOURS`. Non-positive values fall back to the default.
    pub fn from_env() -> Self {
        let hours = get_env_with_fallback_parse(
            "DALOG_SESSION_TTL_HOURS",
            "SESSION_TTL_HOURS",
            DEFAULT_SESSION_TTL_HOURS,
        );
        let hours = if hours > 0 {
            hours
        } else {
            DEFAULT_SESSION_TTL_HOURS
        };
        Self {
            ttl: Duration::hours(hours),
        }
    }

    /// Session lifetime in whole seconds (cookie `Max-Age`, `expires_in`).
    pub fn ttl_secs(&self) -> usize {
        self.ttl.num_seconds().max(0) as usize
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
        }
    }
}
