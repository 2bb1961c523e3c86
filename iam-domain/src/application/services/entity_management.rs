use crate::{
    application::ports::*,
    domain::{entities::*, errors::DomainResult},
};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{info, instrument};

/// Generic management service for one entity family.
///
/// Forwards every operation to its store and returns the store's result
/// unchanged. This is the place for cross-cutting rules (authorization,
/// auditing) should they ever be needed; today it holds no state of its own.
pub struct EntityManager<M, S> {
    store: Arc<S>,
    _marker: PhantomData<fn() -> M>,
}

impl<M: Entity, S: Store<M>> EntityManager<M, S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// The store this manager delegates to
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Get an entity by key
    #[instrument(skip(self), fields(kind = %M::kind()))]
    pub async fn get_by_key(&self, key: &M::Key) -> DomainResult<M> {
        self.store.get_by_key(key).await
    }

    /// Create an entity and return the key it was stored under
    #[instrument(skip(self, model, mapper), fields(kind = %M::kind(), key = %model.key()))]
    pub async fn create(
        &self,
        model: &M,
        mapper: &dyn OperationMapper<M, Payload = S::Payload>,
    ) -> DomainResult<M::Key> {
        let key = self.store.create(model, mapper).await?;
        info!("Created {} '{}'", M::kind(), key);
        Ok(key)
    }

    /// Update the entity stored under `key`
    #[instrument(skip(self, model, mapper), fields(kind = %M::kind()))]
    pub async fn update(
        &self,
        key: &M::Key,
        model: &M,
        mapper: &dyn OperationMapper<M, Payload = S::Payload>,
    ) -> DomainResult<()> {
        self.store.update(key, model, mapper).await?;
        info!("Updated {} '{}'", M::kind(), key);
        Ok(())
    }

    /// Delete the entity stored under `key`
    #[instrument(skip(self), fields(kind = %M::kind()))]
    pub async fn delete_by_key(&self, key: &M::Key) -> DomainResult<()> {
        self.store.delete_by_key(key).await?;
        info!("Deleted {} '{}'", M::kind(), key);
        Ok(())
    }
}

impl<M, S> Clone for EntityManager<M, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _marker: PhantomData,
        }
    }
}

/// Manager for client grants
pub type GrantManager<S> = EntityManager<Grant, S>;

/// Manager for applications
pub type ApplicationManager<S> = EntityManager<Application, S>;

/// Manager for API resources
pub type ApiManager<S> = EntityManager<ApiResource, S>;
