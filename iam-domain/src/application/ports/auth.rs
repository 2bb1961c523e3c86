use crate::domain::errors::AuthError;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Bearer token issued to a machine-to-machine application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub scope: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Token expiring `expires_in` seconds from now.
    ///
    /// Fails when the expiry is not representable.
    pub fn new(
        access_token: String,
        expires_in: i64,
        token_type: Option<String>,
    ) -> Result<Self, AuthError> {
        let expires_at = TimeDelta::try_seconds(expires_in)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| AuthError::TokenAcquisitionFailed {
                reason: format!("Token lifetime out of range: {expires_in}s"),
            })?;

        Ok(Self {
            access_token,
            token_type: token_type.unwrap_or_else(|| "Bearer".to_string()),
            scope: None,
            expires_at,
        })
    }

    pub fn with_scope(mut self, scope: Option<String>) -> Self {
        self.scope = scope;
        self
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// True when the token expires within `seconds`; an unrepresentable
    /// window counts as expiring.
    pub fn is_expiring_soon(&self, seconds: i64) -> bool {
        let deadline =
            TimeDelta::try_seconds(seconds).and_then(|window| Utc::now().checked_add_signed(window));
        match deadline {
            Some(deadline) => deadline >= self.expires_at,
            None => true,
        }
    }
}

/// Client credentials for the management API
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub audience: String,
}

impl ClientCredentials {
    pub fn new(client_id: String, client_secret: String, audience: String) -> Self {
        Self {
            client_id,
            client_secret,
            audience,
        }
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("audience", &self.audience)
            .finish()
    }
}

/// Token acquisition port
#[async_trait]
pub trait TokenManager: Send + Sync {
    /// Acquire a new token using client credentials
    async fn acquire_token(&self, credentials: &ClientCredentials)
        -> Result<AccessToken, AuthError>;
}

/// Supplies the bearer token for each outbound management call
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn bearer_token(&self) -> Result<String, AuthError>;
}

/// Pre-provisioned token, e.g. one issued out of band
#[derive(Clone)]
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn bearer_token(&self) -> Result<String, AuthError> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_checks() {
        let token = AccessToken::new("abc".to_string(), 3600, None).unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert!(!token.is_expired());
        assert!(!token.is_expiring_soon(60));
        assert!(token.is_expiring_soon(7200));

        let expired = AccessToken::new("abc".to_string(), -1, None).unwrap();
        assert!(expired.is_expired());
    }

    #[test]
    fn out_of_range_lifetimes_do_not_panic() {
        let err = AccessToken::new("abc".to_string(), i64::MAX, None).unwrap_err();
        assert!(matches!(err, AuthError::TokenAcquisitionFailed { .. }));

        let token = AccessToken::new("abc".to_string(), 3600, None).unwrap();
        assert!(token.is_expiring_soon(i64::MAX));
        assert!(token.is_expiring_soon(10_000_000_000_000_000));
    }

    #[test]
    fn credentials_debug_hides_secret() {
        let creds = ClientCredentials::new(
            "id".to_string(),
            "super-secret".to_string(),
            "https://tenant/api/v2/".to_string(),
        );
        assert!(!format!("{creds:?}").contains("super-secret"));
    }
}
