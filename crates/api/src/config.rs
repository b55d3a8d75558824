use std::fmt::Display;
use std::str::FromStr;

use cursos_core::pagination::DEFAULT_PAGE_SIZE;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// List pagination settings.
    pub pagination: PaginationConfig,
    /// JWT validation settings.
    pub jwt: JwtConfig,
}

/// Server-wide pagination defaults.
#[derive(Debug, Clone, Copy)]
pub struct PaginationConfig {
    /// When `false`, list endpoints return bare arrays.
    pub enabled: bool,
    /// Records per page when an endpoint does not fix its own size.
    pub page_size: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `PAGE_SIZE`            | `10`                       |
    /// | `PAGINATION_ENABLED`   | `true`                     |
    ///
    /// JWT settings are documented on [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on malformed values; misconfiguration should stop startup.
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();

        let pagination = PaginationConfig {
            enabled: env_or("PAGINATION_ENABLED", true),
            page_size: env_or("PAGE_SIZE", DEFAULT_PAGE_SIZE),
        };
        assert!(pagination.page_size > 0, "PAGE_SIZE must be positive");

        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 8000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            pagination,
            jwt: JwtConfig::from_env(),
        }
    }
}

/// Parse `key` from the environment, or fall back to `default` when unset.
///
/// # Panics
///
/// Panics if the variable is set but does not parse as `T`.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value {raw:?}: {e}")),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variable_uses_default() {
        assert_eq!(env_or("CURSOS_TEST_SURELY_UNSET", 17_u16), 17);
    }

    #[test]
    fn pagination_defaults() {
        let defaults = PaginationConfig::default();
        assert!(defaults.enabled);
        assert_eq!(defaults.page_size, DEFAULT_PAGE_SIZE);
    }
}
