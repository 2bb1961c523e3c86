use crate::{
    application::{ports::*, services::EntityManager},
    domain::{entities::*, errors::DomainResult},
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// User management service: the generic operations plus lookup by email
pub struct UserManager<M, S> {
    inner: EntityManager<M, S>,
}

impl<M: Entity + HasEmail, S: UserStore<M>> UserManager<M, S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            inner: EntityManager::new(store),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        self.inner.store()
    }

    pub async fn get_by_key(&self, key: &M::Key) -> DomainResult<M> {
        self.inner.get_by_key(key).await
    }

    pub async fn create(
        &self,
        model: &M,
        mapper: &dyn OperationMapper<M, Payload = S::Payload>,
    ) -> DomainResult<M::Key> {
        self.inner.create(model, mapper).await
    }

    pub async fn update(
        &self,
        key: &M::Key,
        model: &M,
        mapper: &dyn OperationMapper<M, Payload = S::Payload>,
    ) -> DomainResult<()> {
        self.inner.update(key, model, mapper).await
    }

    pub async fn delete_by_key(&self, key: &M::Key) -> DomainResult<()> {
        self.inner.delete_by_key(key).await
    }

    /// All users registered under `email`; empty when none match
    #[instrument(skip(self))]
    pub async fn get_by_email(&self, email: &str) -> DomainResult<Vec<M>> {
        let users = self.inner.store().get_by_email(email).await?;
        debug!("Found {} users for email", users.len());
        Ok(users)
    }
}

impl<M, S> Clone for UserManager<M, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
