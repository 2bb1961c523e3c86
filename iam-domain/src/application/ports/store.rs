use crate::application::ports::mapper::OperationMapper;
use crate::domain::{entities::*, errors::DomainResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Persistence port for one entity family.
///
/// Implementations must be safe to share between concurrent callers. Every
/// mutation is all-or-nothing: a failed call leaves the store unchanged.
#[async_trait]
pub trait Store<M: Entity>: Send + Sync {
    /// Representation the store consumes on create and update
    type Payload: Send;

    /// Fetch the entity stored under `key`, or `NotFound`.
    async fn get_by_key(&self, key: &M::Key) -> DomainResult<M>;

    /// Persist a new entity and return its key, which the backend may assign.
    ///
    /// Fails with `Conflict` when the key is already taken.
    async fn create(
        &self,
        model: &M,
        mapper: &dyn OperationMapper<M, Payload = Self::Payload>,
    ) -> DomainResult<M::Key>;

    /// Replace the mutable attributes of the entity under `key`, or `NotFound`.
    async fn update(
        &self,
        key: &M::Key,
        model: &M,
        mapper: &dyn OperationMapper<M, Payload = Self::Payload>,
    ) -> DomainResult<()>;

    /// Remove the entity under `key`. See [`DeletePolicy`] for missing keys.
    async fn delete_by_key(&self, key: &M::Key) -> DomainResult<()>;
}

/// User-family store with lookup by email
#[async_trait]
pub trait UserStore<M: Entity + HasEmail>: Store<M> {
    /// All entities registered under `email`; empty when none match.
    async fn get_by_email(&self, email: &str) -> DomainResult<Vec<M>>;
}

/// What deleting an unknown key does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeletePolicy {
    /// Missing key is a `NotFound` error
    #[default]
    Strict,
    /// Missing key is a successful no-op
    Idempotent,
}

impl std::fmt::Display for DeletePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeletePolicy::Strict => write!(f, "strict"),
            DeletePolicy::Idempotent => write!(f, "idempotent"),
        }
    }
}

impl std::str::FromStr for DeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(DeletePolicy::Strict),
            "idempotent" => Ok(DeletePolicy::Idempotent),
            _ => Err(format!("Invalid delete policy: {s}")),
        }
    }
}

/// How store instances are shared between the managers built from one builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ServiceLifetime {
    /// One store handle shared by every manager
    #[default]
    Shared,
    /// A fresh store for every manager
    PerManager,
}

impl std::fmt::Display for ServiceLifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceLifetime::Shared => write!(f, "shared"),
            ServiceLifetime::PerManager => write!(f, "per-manager"),
        }
    }
}

impl std::str::FromStr for ServiceLifetime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shared" | "singleton" => Ok(ServiceLifetime::Shared),
            "per-manager" | "per_manager" | "scoped" | "transient" => {
                Ok(ServiceLifetime::PerManager)
            }
            _ => Err(format!("Invalid service lifetime: {s}")),
        }
    }
}
