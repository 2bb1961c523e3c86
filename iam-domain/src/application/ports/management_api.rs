use crate::domain::errors::ApiError;
use async_trait::async_trait;
use serde_json::Value;

/// Port for the identity provider's management API.
///
/// Paths are relative to the API root (e.g. `users/auth0|123`). Implementations
/// own authentication, pagination and rate limiting; callers add no retries.
#[async_trait]
pub trait ManagementApi: Send + Sync {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ApiError>;

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    async fn patch(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    async fn delete(&self, path: &str) -> Result<(), ApiError>;
}
