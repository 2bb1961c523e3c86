use crate::application::ports::{
    AppConfig, Auth0Config, AuthConfig, ConfigurationPort, Environment, HttpConfig,
    LoggingConfig, StoreConfig,
};
use crate::domain::errors::DomainResult;

/// Environment-based configuration adapter
pub struct EnvConfigurationAdapter {
    config: AppConfig,
}

impl EnvConfigurationAdapter {
    pub fn new() -> DomainResult<Self> {
        let config = AppConfig::from_env()?;
        Ok(Self { config })
    }

    /// Wrap an already-loaded configuration
    pub fn from_config(config: AppConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl ConfigurationPort for EnvConfigurationAdapter {
    fn get_auth0_config(&self) -> Option<&Auth0Config> {
        self.config.auth0.as_ref()
    }

    fn get_auth_config(&self) -> &AuthConfig {
        &self.config.auth
    }

    fn get_http_config(&self) -> &HttpConfig {
        &self.config.http
    }

    fn get_logging_config(&self) -> &LoggingConfig {
        &self.config.logging
    }

    fn get_store_config(&self) -> &StoreConfig {
        &self.config.store
    }

    fn validate(&self) -> DomainResult<()> {
        self.config.validate()
    }

    fn get_environment(&self) -> &Environment {
        &self.config.environment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{Environment, StoreBackend};

    #[test]
    fn exposes_loaded_sections() {
        let adapter = EnvConfigurationAdapter::from_config(AppConfig::in_memory()).unwrap();
        assert!(adapter.get_auth0_config().is_none());
        assert_eq!(adapter.get_store_config().backend, StoreBackend::InMemory);
        assert_eq!(adapter.get_environment(), &Environment::Development);
        assert!(adapter.validate().is_ok());
    }

    #[test]
    fn rejects_auth0_backend_without_tenant() {
        let mut config = AppConfig::in_memory();
        config.store.backend = StoreBackend::Auth0;
        assert!(EnvConfigurationAdapter::from_config(config).is_err());
    }
}
