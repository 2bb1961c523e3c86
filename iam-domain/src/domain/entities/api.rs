use super::common::*;
use serde::{Deserialize, Serialize};

/// Permission exposed by an API resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiScope {
    pub value: String,
    pub description: Option<String>,
}

impl ApiScope {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Domain entity representing a protected API (resource server)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResource<K = EntityKey> {
    pub key: K,
    pub name: String,
    /// Audience value tokens are issued for; immutable once created
    pub identifier: String,
    #[serde(default)]
    pub scopes: Vec<ApiScope>,
    pub signing_alg: Option<String>,
    pub token_lifetime: Option<u32>,
}

impl<K: Key> ApiResource<K> {
    pub fn new(key: K, name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
            identifier: identifier.into(),
            scopes: Vec::new(),
            signing_alg: None,
            token_lifetime: None,
        }
    }

    /// Add a scope, replacing any existing scope with the same value
    pub fn add_scope(&mut self, scope: ApiScope) {
        self.scopes.retain(|s| s.value != scope.value);
        self.scopes.push(scope);
    }

    pub fn with_scope(mut self, scope: ApiScope) -> Self {
        self.add_scope(scope);
        self
    }

    pub fn with_token_lifetime(mut self, seconds: u32) -> Self {
        self.token_lifetime = Some(seconds);
        self
    }

    pub fn with_signing_alg(mut self, alg: impl Into<String>) -> Self {
        self.signing_alg = Some(alg.into());
        self
    }
}

impl<K: Key> Entity for ApiResource<K> {
    type Key = K;

    fn kind() -> EntityKind {
        EntityKind::ApiResource
    }

    fn key(&self) -> &K {
        &self.key
    }
}
