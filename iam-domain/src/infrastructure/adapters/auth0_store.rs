use async_trait::async_trait;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::application::ports::{DeletePolicy, ManagementApi, OperationMapper, Store, UserStore};
use crate::domain::{entities::*, errors::*};

/// Entity family exposed by the Auth0 Management API
pub trait RemoteEntity: Entity {
    /// Collection path under `/api/v2`
    const COLLECTION: &'static str;
    /// Field holding the key in provider payloads
    const KEY_FIELD: &'static str;

    /// Decode a provider representation
    fn from_remote(value: Value) -> DomainResult<Self>;
}

/// Store that delegates every operation to the Auth0 Management API.
///
/// One call per operation. Rate limiting, pagination and retries belong to
/// the injected client; this type holds no locks and no state.
pub struct Auth0Store<M> {
    api: Arc<dyn ManagementApi>,
    delete_policy: DeletePolicy,
    _marker: PhantomData<fn() -> M>,
}

impl<M: RemoteEntity> Auth0Store<M> {
    pub fn new(api: Arc<dyn ManagementApi>) -> Self {
        Self::with_delete_policy(api, DeletePolicy::default())
    }

    pub fn with_delete_policy(api: Arc<dyn ManagementApi>, delete_policy: DeletePolicy) -> Self {
        Self {
            api,
            delete_policy,
            _marker: PhantomData,
        }
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    fn entity_path(key: &M::Key) -> String {
        format!(
            "{}/{}",
            M::COLLECTION,
            urlencoding::encode(&key.to_string())
        )
    }

    fn key_from_response(response: &Value) -> DomainResult<M::Key> {
        let raw = response
            .get(M::KEY_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| DomainError::Serialization {
                message: format!(
                    "{} create response carries no '{}'",
                    M::kind(),
                    M::KEY_FIELD
                ),
            })?;
        <M::Key as Key>::parse_key(raw)
    }
}

impl<M> Clone for Auth0Store<M> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            delete_policy: self.delete_policy,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<M: RemoteEntity> Store<M> for Auth0Store<M> {
    type Payload = Value;

    #[instrument(skip(self), fields(kind = %M::kind()))]
    async fn get_by_key(&self, key: &M::Key) -> DomainResult<M> {
        let response = self
            .api
            .get(&Self::entity_path(key), &[])
            .await
            .map_err(|e| e.into_domain(M::kind(), key))?;

        M::from_remote(response)
    }

    #[instrument(skip(self, model, mapper), fields(kind = %M::kind(), key = %model.key()))]
    async fn create(
        &self,
        model: &M,
        mapper: &dyn OperationMapper<M, Payload = Value>,
    ) -> DomainResult<M::Key> {
        let payload = mapper.map(model)?;

        let response = self
            .api
            .post(M::COLLECTION, &payload)
            .await
            .map_err(|e| e.into_domain(M::kind(), model.key()))?;

        let key = Self::key_from_response(&response)?;
        debug!(assigned = %key, "provider accepted create");
        Ok(key)
    }

    #[instrument(skip(self, model, mapper), fields(kind = %M::kind()))]
    async fn update(
        &self,
        key: &M::Key,
        model: &M,
        mapper: &dyn OperationMapper<M, Payload = Value>,
    ) -> DomainResult<()> {
        let payload = mapper.map(model)?;

        self.api
            .patch(&Self::entity_path(key), &payload)
            .await
            .map_err(|e| e.into_domain(M::kind(), key))?;

        Ok(())
    }

    #[instrument(skip(self), fields(kind = %M::kind()))]
    async fn delete_by_key(&self, key: &M::Key) -> DomainResult<()> {
        match self.api.delete(&Self::entity_path(key)).await {
            Ok(()) => Ok(()),
            Err(ApiError::Status { status: 404, .. })
                if self.delete_policy == DeletePolicy::Idempotent =>
            {
                debug!("provider reported no such entity; treated as deleted");
                Ok(())
            }
            Err(e) => Err(e.into_domain(M::kind(), key)),
        }
    }
}

#[async_trait]
impl<M: RemoteEntity + HasEmail> UserStore<M> for Auth0Store<M> {
    #[instrument(skip(self))]
    async fn get_by_email(&self, email: &str) -> DomainResult<Vec<M>> {
        let response = self
            .api
            .get("users-by-email", &[("email", email)])
            .await
            .map_err(DomainError::from)?;

        match response {
            Value::Array(items) => items.into_iter().map(M::from_remote).collect(),
            other => Err(DomainError::Serialization {
                message: format!("Expected a list of users, got {other}"),
            }),
        }
    }
}
