//! Environment-driven configuration for the ERP API client.
//!
//! Values are read once (after `.env` has been loaded by `main`) and only
//! validated by type coercion. A malformed value is a startup error.

use std::{env, str::FromStr, sync::LazyLock, time::Duration};

use crate::mcp::error::ErpError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_AUTH_ENDPOINT: &str = "/auth/login";
pub const DEFAULT_TOKEN_PATHS: &str = "data.token,token,access_token";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

pub static ERP_CONFIG: LazyLock<Result<ErpConfig, ErpError>> = LazyLock::new(ErpConfig::from_env);

#[derive(Debug, Clone)]
pub struct ErpConfig {
    pub base_url: String,
    pub auth_endpoint: String,
    pub default_email: String,
    pub default_password: String,
    pub timeout: Duration,
    /// Loaded for compatibility with existing deployments; requests are never retried.
    pub max_retries: u32,
    pub default_page: u32,
    pub default_per_page: u32,
    pub max_per_page: u32,
    /// Ordered dotted paths tried for a bearer token in a login response.
    pub token_paths: Vec<String>,
    pub user_agent: String,
    pub cache: CacheSettings,
    pub bind_address: String,
    /// MySQL connection URL for the direct database tools; unset disables them.
    pub database_url: Option<String>,
}

/// Response cache settings. Read but not acted upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    pub enabled: bool,
    pub ttl: Duration,
    pub max_size: usize,
}

impl Default for ErpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_endpoint: DEFAULT_AUTH_ENDPOINT.to_string(),
            default_email: String::new(),
            default_password: String::new(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            default_page: 1,
            default_per_page: 15,
            max_per_page: 100,
            token_paths: split_list(DEFAULT_TOKEN_PATHS),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            cache: CacheSettings {
                enabled: false,
                ttl: Duration::from_secs(300),
                max_size: 1000,
            },
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            database_url: None,
        }
    }
}

impl ErpConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns `ErpError::Config` when a variable is set but cannot be coerced
    /// into its expected type.
    pub fn from_env() -> Result<Self, ErpError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to
    /// defaults for absent keys.
    ///
    /// # Errors
    /// Returns `ErpError::Config` on values that fail to parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ErpError> {
        let defaults = Self::default();
        let text = |key: &str, default: String| lookup(key).unwrap_or(default);

        let token_paths = lookup("ERP_TOKEN_PATHS")
            .map(|raw| split_list(&raw))
            .unwrap_or(defaults.token_paths);
        if token_paths.is_empty() {
            return Err(ErpError::Config(
                "ERP_TOKEN_PATHS must name at least one lookup path".to_string(),
            ));
        }

        let config = Self {
            base_url: text("ERP_API_BASE_URL", defaults.base_url),
            auth_endpoint: text("ERP_AUTH_ENDPOINT", defaults.auth_endpoint),
            default_email: text("ERP_DEFAULT_EMAIL", defaults.default_email),
            default_password: text("ERP_DEFAULT_PASSWORD", defaults.default_password),
            timeout: Duration::from_secs(parse_or(&lookup, "ERP_API_TIMEOUT", 30)?),
            max_retries: parse_or(&lookup, "ERP_MAX_RETRIES", defaults.max_retries)?,
            default_page: parse_or(&lookup, "ERP_DEFAULT_PAGE", defaults.default_page)?,
            default_per_page: parse_or(&lookup, "ERP_DEFAULT_PER_PAGE", defaults.default_per_page)?,
            max_per_page: parse_or(&lookup, "ERP_MAX_PER_PAGE", defaults.max_per_page)?,
            token_paths,
            user_agent: text("ERP_USER_AGENT", defaults.user_agent),
            cache: CacheSettings {
                enabled: lookup("ERP_CACHE_ENABLED")
                    .is_some_and(|v| v.trim().eq_ignore_ascii_case("true")),
                ttl: Duration::from_secs(parse_or(&lookup, "ERP_CACHE_TTL", 300)?),
                max_size: parse_or(&lookup, "ERP_CACHE_MAX_SIZE", defaults.cache.max_size)?,
            },
            bind_address: text("ERP_BIND_ADDRESS", defaults.bind_address),
            database_url: lookup("ERP_DB_URL")
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
        };

        if config.default_page == 0 || config.default_per_page == 0 {
            return Err(ErpError::Config(
                "pagination defaults must be positive integers".to_string(),
            ));
        }
        if config.default_per_page > config.max_per_page {
            return Err(ErpError::Config(format!(
                "ERP_DEFAULT_PER_PAGE ({}) exceeds ERP_MAX_PER_PAGE ({})",
                config.default_per_page, config.max_per_page
            )));
        }

        Ok(config)
    }

    /// Full URL of the login endpoint.
    #[must_use]
    pub fn auth_url(&self) -> String {
        self.url_for(&self.auth_endpoint)
    }

    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ErpError>
where
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e| ErpError::Config(format!("{key}={raw:?}: {e}")))
    })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ErpConfig, ErpError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ErpConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.base_url, "http://localhost:8000/api");
        assert_eq!(config.auth_endpoint, "/auth/login");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.default_page, 1);
        assert_eq!(config.default_per_page, 15);
        assert_eq!(config.max_per_page, 100);
        assert_eq!(config.token_paths, vec!["data.token", "token", "access_token"]);
        assert!(!config.cache.enabled);
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn database_backend_is_enabled_by_a_non_blank_url() {
        let config = config_from(&[("ERP_DB_URL", " mysql://root@localhost:3306/erp ")]).unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("mysql://root@localhost:3306/erp")
        );
        assert_eq!(config_from(&[("ERP_DB_URL", "  ")]).unwrap().database_url, None);
    }

    #[test]
    fn environment_values_override_defaults() {
        let config = config_from(&[
            ("ERP_API_BASE_URL", "https://erp.example.com/api/"),
            ("ERP_API_TIMEOUT", "5"),
            ("ERP_TOKEN_PATHS", "payload.jwt, token"),
            ("ERP_CACHE_ENABLED", "TRUE"),
        ])
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.token_paths, vec!["payload.jwt", "token"]);
        assert!(config.cache.enabled);
        assert_eq!(
            config.auth_url(),
            "https://erp.example.com/api/auth/login"
        );
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = config_from(&[("ERP_API_TIMEOUT", "thirty")]).unwrap_err();
        assert_eq!(err.kind(), "ConfigError");
        assert!(err.to_string().contains("ERP_API_TIMEOUT"));
    }

    #[test]
    fn empty_token_path_list_is_rejected() {
        assert!(config_from(&[("ERP_TOKEN_PATHS", " , ")]).is_err());
    }

    #[test]
    fn default_page_size_must_fit_under_the_cap() {
        assert!(config_from(&[("ERP_DEFAULT_PER_PAGE", "150")]).is_err());
        assert!(config_from(&[("ERP_DEFAULT_PAGE", "0")]).is_err());
    }
}
