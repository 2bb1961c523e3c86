use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier capability shared by every entity family.
///
/// Keys are plain values: equal underlying values compare equal and hash
/// identically, and `Display` is the string form sent to remote backends.
pub trait Key: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static {
    /// Parse a key from its string form (e.g. an id assigned by a backend).
    fn parse_key(raw: &str) -> DomainResult<Self>;
}

/// Default text key for entities
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityKey(String);

impl EntityKey {
    /// Build a key, rejecting empty or all-whitespace text.
    pub fn new(id: impl Into<String>) -> DomainResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::validation("key", "Key cannot be empty"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Key for EntityKey {
    fn parse_key(raw: &str) -> DomainResult<Self> {
        Self::new(raw)
    }
}

impl Key for String {
    fn parse_key(raw: &str) -> DomainResult<Self> {
        Ok(raw.to_string())
    }
}

impl Key for Uuid {
    fn parse_key(raw: &str) -> DomainResult<Self> {
        Uuid::parse_str(raw).map_err(|e| DomainError::validation("key", e.to_string()))
    }
}

impl TryFrom<String> for EntityKey {
    type Error = DomainError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl TryFrom<&str> for EntityKey {
    type Error = DomainError;

    fn try_from(id: &str) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<EntityKey> for String {
    fn from(key: EntityKey) -> Self {
        key.0
    }
}

impl FromStr for EntityKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for EntityKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The managed entity families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    User,
    Grant,
    Application,
    ApiResource,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::User => "User",
            EntityKind::Grant => "Grant",
            EntityKind::Application => "Application",
            EntityKind::ApiResource => "API resource",
        };
        write!(f, "{name}")
    }
}

/// A keyed domain model
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    type Key: Key;

    fn kind() -> EntityKind;

    fn key(&self) -> &Self::Key;
}

/// Entities that carry an email address
pub trait HasEmail {
    fn email(&self) -> Option<&str>;
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(
            field,
            format!("{field} cannot be empty"),
        ));
    }
    Ok(())
}
