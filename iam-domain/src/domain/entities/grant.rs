use super::common::*;
use serde::{Deserialize, Serialize};

/// Authorization of an application to call an API with a set of scopes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant<K = EntityKey> {
    pub key: K,
    pub client_id: String,
    pub audience: String,
    #[serde(default)]
    pub scope: Vec<String>,
}

impl<K: Key> Grant<K> {
    pub fn new(key: K, client_id: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            key,
            client_id: client_id.into(),
            audience: audience.into(),
            scope: Vec::new(),
        }
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = scopes.into_iter().map(Into::into).collect();
        self
    }
}

impl<K: Key> Entity for Grant<K> {
    type Key = K;

    fn kind() -> EntityKind {
        EntityKind::Grant
    }

    fn key(&self) -> &K {
        &self.key
    }
}
