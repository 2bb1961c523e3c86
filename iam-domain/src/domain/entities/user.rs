use super::common::*;
use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Domain entity representing a user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User<K = EntityKey> {
    pub key: K,
    pub email: Option<String>,
    pub email_verified: bool,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub nickname: Option<String>,
    /// Identity-provider connection the account lives in
    pub connection: Option<String>,
    /// Initial password; only ever sent, never read back
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    pub blocked: bool,
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
    #[serde(default)]
    pub app_metadata: Map<String, Value>,
}

impl<K: Key> User<K> {
    pub fn new(key: K) -> Self {
        Self {
            key,
            email: None,
            email_verified: false,
            name: None,
            given_name: None,
            family_name: None,
            nickname: None,
            connection: None,
            password: None,
            blocked: false,
            user_metadata: Map::new(),
            app_metadata: Map::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_name(mut self, given_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        let given_name = given_name.into();
        let family_name = family_name.into();
        self.name = Some(format!("{given_name} {family_name}"));
        self.given_name = Some(given_name);
        self.family_name = Some(family_name);
        self
    }

    pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = Some(connection.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_user_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.user_metadata.insert(key.into(), value);
        self
    }

    pub fn with_app_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.app_metadata.insert(key.into(), value);
        self
    }

    /// Get full display name
    pub fn display_name(&self) -> String {
        if let Some(ref name) = self.name {
            return name.clone();
        }
        match (&self.given_name, &self.family_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self
                .email
                .clone()
                .unwrap_or_else(|| self.key.to_string()),
        }
    }
}

impl User {
    /// Validate email address
    pub fn validate_email(email: &str) -> DomainResult<()> {
        let invalid = || DomainError::Validation {
            field: "email".to_string(),
            message: format!("Invalid email address: {email}"),
        };

        if email.is_empty() || !email.contains('.') {
            return Err(invalid());
        }

        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            return Err(invalid());
        }

        Ok(())
    }
}

impl<K: Key> Entity for User<K> {
    type Key = K;

    fn kind() -> EntityKind {
        EntityKind::User
    }

    fn key(&self) -> &K {
        &self.key
    }
}

impl<K> HasEmail for User<K> {
    fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
