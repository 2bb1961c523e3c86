use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::application::ports::auth::*;
use crate::application::ports::config::{Auth0Config, AuthConfig};
use crate::domain::errors::*;

/// Raw token response from the Auth0 token endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawTokenResponse {
    access_token: String,
    expires_in: i64,
    scope: Option<String>,
    token_type: Option<String>,
}

/// Auth0 client-credentials token manager
pub struct Auth0TokenManager {
    token_url: String,
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl Auth0TokenManager {
    pub fn new(token_url: String) -> Self {
        Self::new_with_client(token_url, reqwest::Client::new())
    }

    pub fn new_with_client(token_url: String, client: reqwest::Client) -> Self {
        Self {
            token_url,
            client,
            timeout: None,
        }
    }

    /// Bound each token request, overriding the client-wide timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn convert_raw_token(&self, raw_token: RawTokenResponse) -> Result<AccessToken, AuthError> {
        Ok(
            AccessToken::new(raw_token.access_token, raw_token.expires_in, raw_token.token_type)?
                .with_scope(raw_token.scope),
        )
    }
}

#[async_trait]
impl TokenManager for Auth0TokenManager {
    #[instrument(skip(self), fields(token_url = %self.token_url))]
    async fn acquire_token(
        &self,
        credentials: &ClientCredentials,
    ) -> Result<AccessToken, AuthError> {
        let body = serde_json::json!({
            "grant_type": "client_credentials",
            "client_id": credentials.client_id,
            "client_secret": credentials.client_secret,
            "audience": credentials.audience,
        });

        let mut request = self.client.post(&self.token_url).json(&body);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AuthError::TokenAcquisitionFailed {
                reason: format!("HTTP request failed: {}", e),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenAcquisitionFailed {
                reason: format!("HTTP error {}: {}", status, error_text),
            });
        }

        let raw_token: RawTokenResponse =
            response
                .json()
                .await
                .map_err(|e| AuthError::TokenAcquisitionFailed {
                    reason: format!("Failed to parse token response: {}", e),
                })?;

        debug!(expires_in = raw_token.expires_in, "acquired management token");
        self.convert_raw_token(raw_token)
    }
}

/// Token source that acquires through a [`TokenManager`] and reuses the token
/// until it is within the refresh threshold of expiring.
pub struct CachedTokenSource {
    manager: Arc<dyn TokenManager>,
    credentials: ClientCredentials,
    refresh_threshold_seconds: i64,
    cached: RwLock<Option<AccessToken>>,
}

impl CachedTokenSource {
    pub fn new(
        manager: Arc<dyn TokenManager>,
        credentials: ClientCredentials,
        refresh_threshold_seconds: i64,
    ) -> Self {
        Self {
            manager,
            credentials,
            refresh_threshold_seconds,
            cached: RwLock::new(None),
        }
    }

    /// Token source for the configured tenant
    pub fn from_config(
        auth0: &Auth0Config,
        auth: &AuthConfig,
        client: reqwest::Client,
    ) -> DomainResult<Self> {
        auth.validate()?;
        let refresh_threshold_seconds = i64::try_from(auth.get_refresh_threshold().as_secs())
            .map_err(|e| ConfigError::InvalidValue {
                key: "token_refresh_threshold_seconds".to_string(),
                message: e.to_string(),
            })?;

        let manager = Auth0TokenManager::new_with_client(auth0.get_token_url(), client)
            .with_timeout(auth.get_auth_timeout());
        let credentials = ClientCredentials::new(
            auth0.client_id.clone(),
            auth0.client_secret.clone(),
            auth0.get_audience(),
        );
        Ok(Self::new(Arc::new(manager), credentials, refresh_threshold_seconds))
    }

    /// Drop the cached token so the next call acquires a fresh one
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }
}

#[async_trait]
impl TokenSource for CachedTokenSource {
    async fn bearer_token(&self) -> Result<String, AuthError> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expiring_soon(self.refresh_threshold_seconds) {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let mut cached = self.cached.write().await;
        // another caller may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expiring_soon(self.refresh_threshold_seconds) {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.manager.acquire_token(&self.credentials).await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingManager {
        calls: AtomicUsize,
        expires_in: i64,
    }

    #[async_trait]
    impl TokenManager for CountingManager {
        async fn acquire_token(
            &self,
            _credentials: &ClientCredentials,
        ) -> Result<AccessToken, AuthError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            AccessToken::new(format!("token-{n}"), self.expires_in, None)
        }
    }

    fn credentials() -> ClientCredentials {
        ClientCredentials::new(
            "client".to_string(),
            "secret".to_string(),
            "https://tenant.auth0.com/api/v2/".to_string(),
        )
    }

    #[tokio::test]
    async fn reuses_token_until_threshold() {
        let manager = Arc::new(CountingManager {
            calls: AtomicUsize::new(0),
            expires_in: 3600,
        });
        let source = CachedTokenSource::new(manager.clone(), credentials(), 300);

        assert_eq!(source.bearer_token().await.unwrap(), "token-1");
        assert_eq!(source.bearer_token().await.unwrap(), "token-1");
        assert_eq!(manager.calls.load(Ordering::SeqCst), 1);

        source.invalidate().await;
        assert_eq!(source.bearer_token().await.unwrap(), "token-2");
    }

    #[test]
    fn oversized_threshold_is_rejected() {
        let auth0 = Auth0Config {
            domain: "tenant.auth0.com".to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            audience: None,
            default_connection: None,
        };
        let auth = AuthConfig {
            token_refresh_threshold_seconds: 10_000_000_000_000_000,
            ..AuthConfig::default()
        };
        let result = CachedTokenSource::from_config(&auth0, &auth, reqwest::Client::new());
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[tokio::test]
    async fn huge_threshold_refreshes_instead_of_panicking() {
        let manager = Arc::new(CountingManager {
            calls: AtomicUsize::new(0),
            expires_in: 3600,
        });
        let source = CachedTokenSource::new(manager.clone(), credentials(), i64::MAX);

        assert_eq!(source.bearer_token().await.unwrap(), "token-1");
        assert_eq!(source.bearer_token().await.unwrap(), "token-2");
    }

    #[tokio::test]
    async fn refreshes_tokens_inside_threshold() {
        let manager = Arc::new(CountingManager {
            calls: AtomicUsize::new(0),
            expires_in: 60,
        });
        let source = CachedTokenSource::new(manager.clone(), credentials(), 300);

        source.bearer_token().await.unwrap();
        source.bearer_token().await.unwrap();
        assert_eq!(manager.calls.load(Ordering::SeqCst), 2);
    }
}
