use crate::application::ports::{DeletePolicy, OperationMapper, Store, UserStore};
use crate::domain::{
    entities::*,
    errors::{DomainError, DomainResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Process-lifetime store backed by a key → model map.
///
/// Mutations hold the write lock for the whole check-and-apply, so two
/// concurrent creates for one key can never both succeed. Reads share the
/// read lock. Clones share the same map.
pub struct InMemoryStore<M: Entity> {
    entities: Arc<RwLock<HashMap<M::Key, M>>>,
    delete_policy: DeletePolicy,
}

impl<M: Entity> InMemoryStore<M> {
    pub fn new() -> Self {
        Self::with_delete_policy(DeletePolicy::default())
    }

    pub fn with_delete_policy(delete_policy: DeletePolicy) -> Self {
        Self {
            entities: Arc::new(RwLock::new(HashMap::new())),
            delete_policy,
        }
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    /// Number of stored entities
    pub async fn len(&self) -> usize {
        self.entities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entities.read().await.is_empty()
    }
}

impl<M: Entity> Default for InMemoryStore<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Entity> Clone for InMemoryStore<M> {
    fn clone(&self) -> Self {
        Self {
            entities: Arc::clone(&self.entities),
            delete_policy: self.delete_policy,
        }
    }
}

#[async_trait]
impl<M: Entity> Store<M> for InMemoryStore<M> {
    type Payload = M;

    async fn get_by_key(&self, key: &M::Key) -> DomainResult<M> {
        self.entities
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| DomainError::not_found(M::kind(), key))
    }

    async fn create(
        &self,
        model: &M,
        mapper: &dyn OperationMapper<M, Payload = M>,
    ) -> DomainResult<M::Key> {
        let record = mapper.map(model)?;
        let key = record.key().clone();

        let mut entities = self.entities.write().await;
        if entities.contains_key(&key) {
            return Err(DomainError::conflict(M::kind(), &key));
        }
        entities.insert(key.clone(), record);

        debug!(kind = %M::kind(), key = %key, "stored entity");
        Ok(key)
    }

    async fn update(
        &self,
        key: &M::Key,
        model: &M,
        mapper: &dyn OperationMapper<M, Payload = M>,
    ) -> DomainResult<()> {
        let record = mapper.map(model)?;
        if record.key() != key {
            return Err(DomainError::validation(
                "key",
                format!(
                    "{} key cannot change on update ({} -> {})",
                    M::kind(),
                    key,
                    record.key()
                ),
            ));
        }

        let mut entities = self.entities.write().await;
        match entities.get_mut(key) {
            Some(existing) => {
                *existing = record;
                debug!(kind = %M::kind(), key = %key, "replaced entity");
                Ok(())
            }
            None => Err(DomainError::not_found(M::kind(), key)),
        }
    }

    async fn delete_by_key(&self, key: &M::Key) -> DomainResult<()> {
        let removed = self.entities.write().await.remove(key);
        match (removed, self.delete_policy) {
            (Some(_), _) => {
                debug!(kind = %M::kind(), key = %key, "removed entity");
                Ok(())
            }
            (None, DeletePolicy::Idempotent) => Ok(()),
            (None, DeletePolicy::Strict) => Err(DomainError::not_found(M::kind(), key)),
        }
    }
}

#[async_trait]
impl<M: Entity + HasEmail> UserStore<M> for InMemoryStore<M> {
    async fn get_by_email(&self, email: &str) -> DomainResult<Vec<M>> {
        let entities = self.entities.read().await;
        Ok(entities
            .values()
            .filter(|m| m.email().is_some_and(|e| e.eq_ignore_ascii_case(email)))
            .cloned()
            .collect())
    }
}
