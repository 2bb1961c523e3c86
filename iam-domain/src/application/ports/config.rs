use crate::application::ports::store::{DeletePolicy, ServiceLifetime};
use crate::domain::errors::{ConfigError, DomainResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration port for accessing application configuration
pub trait ConfigurationPort: Send + Sync {
    /// Get Auth0 tenant configuration, if a tenant is configured
    fn get_auth0_config(&self) -> Option<&Auth0Config>;

    /// Get token handling configuration
    fn get_auth_config(&self) -> &AuthConfig;

    /// Get HTTP client configuration
    fn get_http_config(&self) -> &HttpConfig;

    /// Get logging configuration
    fn get_logging_config(&self) -> &LoggingConfig;

    /// Get store wiring configuration
    fn get_store_config(&self) -> &StoreConfig;

    /// Validate all configuration
    fn validate(&self) -> DomainResult<()>;

    /// Get the deployment environment
    fn get_environment(&self) -> &Environment;
}

/// Auth0 tenant configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct Auth0Config {
    /// Tenant domain, e.g. `my-tenant.eu.auth0.com`
    pub domain: String,
    pub client_id: String,
    pub client_secret: String,
    /// Management API audience; defaults to `https://{domain}/api/v2/`
    pub audience: Option<String>,
    /// Connection new users are created in when the model names none
    pub default_connection: Option<String>,
}

impl Auth0Config {
    pub fn validate(&self) -> DomainResult<()> {
        if self.domain.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "AUTH0_DOMAIN".to_string(),
            }
            .into());
        }

        if self.domain.contains("://") || self.domain.contains('/') {
            return Err(ConfigError::InvalidValue {
                key: "AUTH0_DOMAIN".to_string(),
                message: "Must be a bare host name without scheme or path".to_string(),
            }
            .into());
        }

        if self.client_id.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "AUTH0_CLIENT_ID".to_string(),
            }
            .into());
        }

        if self.client_secret.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "AUTH0_CLIENT_SECRET".to_string(),
            }
            .into());
        }

        Ok(())
    }

    pub fn base_url(&self) -> String {
        format!("https://{}", self.domain.trim_end_matches('/'))
    }

    pub fn get_api_url(&self) -> String {
        format!("{}/api/v2", self.base_url())
    }

    pub fn get_token_url(&self) -> String {
        format!("{}/oauth/token", self.base_url())
    }

    pub fn get_audience(&self) -> String {
        self.audience
            .clone()
            .unwrap_or_else(|| format!("{}/", self.get_api_url()))
    }
}

impl std::fmt::Debug for Auth0Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth0Config")
            .field("domain", &self.domain)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("audience", &self.audience)
            .field("default_connection", &self.default_connection)
            .finish()
    }
}

/// Upper bound for the token refresh threshold (one day)
pub const MAX_TOKEN_REFRESH_THRESHOLD_SECONDS: u64 = 86_400;

/// Token handling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub token_refresh_threshold_seconds: u64,
    pub authentication_timeout_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_refresh_threshold_seconds: 300, // 5 minutes
            authentication_timeout_seconds: 30,
        }
    }
}

impl AuthConfig {
    pub fn validate(&self) -> DomainResult<()> {
        if self.authentication_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "authentication_timeout_seconds".to_string(),
                message: "Must be greater than 0".to_string(),
            }
            .into());
        }

        if self.token_refresh_threshold_seconds > MAX_TOKEN_REFRESH_THRESHOLD_SECONDS {
            return Err(ConfigError::InvalidValue {
                key: "token_refresh_threshold_seconds".to_string(),
                message: format!("Must not exceed {MAX_TOKEN_REFRESH_THRESHOLD_SECONDS}"),
            }
            .into());
        }

        Ok(())
    }

    pub fn get_refresh_threshold(&self) -> Duration {
        Duration::from_secs(self.token_refresh_threshold_seconds)
    }

    pub fn get_auth_timeout(&self) -> Duration {
        Duration::from_secs(self.authentication_timeout_seconds)
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    pub max_idle_connections: usize,
    pub pool_idle_timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            connect_timeout_seconds: 10,
            max_idle_connections: 32,
            pool_idle_timeout_seconds: 30,
            user_agent: concat!("iam-domain/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn validate(&self) -> DomainResult<()> {
        if self.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout_seconds".to_string(),
                message: "Must be greater than 0".to_string(),
            }
            .into());
        }

        if self.connect_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "connect_timeout_seconds".to_string(),
                message: "Must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }

    pub fn get_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn get_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    pub fn get_pool_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_idle_timeout_seconds)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub enable_colors: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            enable_colors: true,
        }
    }
}

/// Log level enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Log format enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
    Full,
}

/// Which store variant backs the managers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    InMemory,
    Auth0,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::InMemory => write!(f, "memory"),
            StoreBackend::Auth0 => write!(f, "auth0"),
        }
    }
}

/// Store wiring configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub lifetime: ServiceLifetime,
    pub delete_policy: DeletePolicy,
}

/// Environment-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Staging,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    /// Present when the Auth0 backend is configured
    pub auth0: Option<Auth0Config>,
    pub auth: AuthConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Configuration for purely in-memory use
    pub fn in_memory() -> Self {
        Self {
            environment: Environment::Development,
            auth0: None,
            auth: AuthConfig::default(),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
            store: StoreConfig::default(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.store.backend == StoreBackend::Auth0 {
            match self.auth0 {
                Some(ref auth0) => auth0.validate()?,
                None => {
                    return Err(ConfigError::MissingRequired {
                        key: "AUTH0_DOMAIN".to_string(),
                    }
                    .into())
                }
            }
        }
        self.auth.validate()?;
        self.http.validate()?;
        Ok(())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> DomainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source
    pub fn from_lookup<F>(lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = parse_or(&lookup, "ENVIRONMENT", Environment::Development)?;

        let store = StoreConfig {
            backend: parse_or(&lookup, "STORE_BACKEND", StoreBackend::InMemory)?,
            lifetime: parse_or(&lookup, "STORE_LIFETIME", ServiceLifetime::Shared)?,
            delete_policy: parse_or(&lookup, "STORE_DELETE_POLICY", DeletePolicy::Strict)?,
        };

        let auth0 = match lookup("AUTH0_DOMAIN") {
            Some(domain) => Some(Auth0Config {
                domain,
                client_id: lookup("AUTH0_CLIENT_ID").ok_or_else(|| {
                    ConfigError::MissingRequired {
                        key: "AUTH0_CLIENT_ID".to_string(),
                    }
                })?,
                client_secret: lookup("AUTH0_CLIENT_SECRET").ok_or_else(|| {
                    ConfigError::MissingRequired {
                        key: "AUTH0_CLIENT_SECRET".to_string(),
                    }
                })?,
                audience: lookup("AUTH0_AUDIENCE"),
                default_connection: lookup("AUTH0_DEFAULT_CONNECTION"),
            }),
            None => None,
        };

        let auth = AuthConfig {
            token_refresh_threshold_seconds: parse_or(
                &lookup,
                "AUTH_TOKEN_REFRESH_THRESHOLD_SECONDS",
                300,
            )?,
            authentication_timeout_seconds: parse_or(&lookup, "AUTH_TIMEOUT_SECONDS", 30)?,
        };

        let http_defaults = HttpConfig::default();
        let http = HttpConfig {
            timeout_seconds: parse_or(&lookup, "HTTP_TIMEOUT_SECONDS", 30)?,
            connect_timeout_seconds: parse_or(&lookup, "HTTP_CONNECT_TIMEOUT_SECONDS", 10)?,
            max_idle_connections: parse_or(&lookup, "HTTP_MAX_IDLE_CONNECTIONS", 32)?,
            pool_idle_timeout_seconds: parse_or(&lookup, "HTTP_POOL_IDLE_TIMEOUT_SECONDS", 30)?,
            user_agent: lookup("HTTP_USER_AGENT").unwrap_or(http_defaults.user_agent),
        };

        let logging = LoggingConfig {
            level: parse_or(&lookup, "LOG_LEVEL", LogLevel::Info)?,
            format: parse_or(&lookup, "LOG_FORMAT", LogFormat::Compact)?,
            enable_colors: parse_or(&lookup, "LOG_COLORS", true)?,
        };

        let config = AppConfig {
            environment,
            auth0,
            auth,
            http,
            logging,
            store,
        };

        config.validate()?;
        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> DomainResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }
            .into()
        }),
        None => Ok(default),
    }
}

/// String parsing implementations
impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {s}")),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {s}")),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "full" => Ok(LogFormat::Full),
            _ => Err(format!("Invalid log format: {s}")),
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "in-memory" | "inmemory" => Ok(StoreBackend::InMemory),
            "auth0" => Ok(StoreBackend::Auth0),
            _ => Err(format!("Invalid store backend: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_in_memory() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.store.backend, StoreBackend::InMemory);
        assert_eq!(config.store.lifetime, ServiceLifetime::Shared);
        assert_eq!(config.store.delete_policy, DeletePolicy::Strict);
        assert!(config.auth0.is_none());
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn auth0_backend_requires_tenant() {
        let result = AppConfig::from_lookup(lookup_from(&[("STORE_BACKEND", "auth0")]));
        assert!(matches!(
            result,
            Err(crate::domain::errors::DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn auth0_backend_loads_tenant_settings() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("STORE_BACKEND", "auth0"),
            ("STORE_LIFETIME", "per-manager"),
            ("STORE_DELETE_POLICY", "idempotent"),
            ("AUTH0_DOMAIN", "tenant.eu.auth0.com"),
            ("AUTH0_CLIENT_ID", "mgmt"),
            ("AUTH0_CLIENT_SECRET", "shh"),
            ("LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        let auth0 = config.auth0.as_ref().unwrap();
        assert_eq!(auth0.get_api_url(), "https://tenant.eu.auth0.com/api/v2");
        assert_eq!(auth0.get_token_url(), "https://tenant.eu.auth0.com/oauth/token");
        assert_eq!(auth0.get_audience(), "https://tenant.eu.auth0.com/api/v2/");
        assert_eq!(config.store.lifetime, ServiceLifetime::PerManager);
        assert_eq!(config.store.delete_policy, DeletePolicy::Idempotent);
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn domain_with_scheme_is_rejected() {
        let config = Auth0Config {
            domain: "https://tenant.auth0.com".to_string(),
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            audience: None,
            default_connection: None,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn refresh_threshold_is_bounded() {
        let result = AppConfig::from_lookup(lookup_from(&[(
            "AUTH_TOKEN_REFRESH_THRESHOLD_SECONDS",
            "10000000000000000",
        )]));
        assert!(matches!(
            result,
            Err(crate::domain::errors::DomainError::Configuration { .. })
        ));

        let auth = AuthConfig {
            token_refresh_threshold_seconds: MAX_TOKEN_REFRESH_THRESHOLD_SECONDS,
            ..AuthConfig::default()
        };
        assert!(auth.validate().is_ok());
    }

    #[test]
    fn malformed_numbers_are_reported() {
        let result = AppConfig::from_lookup(lookup_from(&[("HTTP_TIMEOUT_SECONDS", "soon")]));
        assert!(result.is_err());
    }
}
