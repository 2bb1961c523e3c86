//! Provider representations of the entity families and their decoding into
//! domain models.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::auth0_store::RemoteEntity;
use crate::domain::{entities::*, errors::*};

fn decode<T: DeserializeOwned>(kind: EntityKind, value: Value) -> DomainResult<T> {
    serde_json::from_value(value).map_err(|e| DomainError::Serialization {
        message: format!("Failed to decode {kind} from provider response: {e}"),
    })
}

#[derive(Debug, Deserialize)]
struct RemoteIdentity {
    connection: String,
}

#[derive(Debug, Deserialize)]
struct RemoteUser {
    user_id: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    name: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    nickname: Option<String>,
    #[serde(default)]
    identities: Vec<RemoteIdentity>,
    #[serde(default)]
    blocked: bool,
    user_metadata: Option<Map<String, Value>>,
    app_metadata: Option<Map<String, Value>>,
}

impl<K: Key> RemoteEntity for User<K> {
    const COLLECTION: &'static str = "users";
    const KEY_FIELD: &'static str = "user_id";

    fn from_remote(value: Value) -> DomainResult<Self> {
        let raw: RemoteUser = decode(EntityKind::User, value)?;
        Ok(User {
            key: K::parse_key(&raw.user_id)?,
            email: raw.email,
            email_verified: raw.email_verified,
            name: raw.name,
            given_name: raw.given_name,
            family_name: raw.family_name,
            nickname: raw.nickname,
            connection: raw.identities.into_iter().next().map(|i| i.connection),
            password: None,
            blocked: raw.blocked,
            user_metadata: raw.user_metadata.unwrap_or_default(),
            app_metadata: raw.app_metadata.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RemoteClientGrant {
    id: String,
    client_id: String,
    audience: String,
    #[serde(default)]
    scope: Vec<String>,
}

impl<K: Key> RemoteEntity for Grant<K> {
    const COLLECTION: &'static str = "client-grants";
    const KEY_FIELD: &'static str = "id";

    fn from_remote(value: Value) -> DomainResult<Self> {
        let raw: RemoteClientGrant = decode(EntityKind::Grant, value)?;
        Ok(Grant {
            key: K::parse_key(&raw.id)?,
            client_id: raw.client_id,
            audience: raw.audience,
            scope: raw.scope,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RemoteClient {
    client_id: String,
    name: String,
    description: Option<String>,
    app_type: Option<String>,
    grant_types: Option<Vec<String>>,
    client_secret: Option<String>,
    callbacks: Option<Vec<String>>,
    #[serde(default)]
    is_first_party: bool,
}

impl<K: Key> RemoteEntity for Application<K> {
    const COLLECTION: &'static str = "clients";
    const KEY_FIELD: &'static str = "client_id";

    fn from_remote(value: Value) -> DomainResult<Self> {
        let raw: RemoteClient = decode(EntityKind::Application, value)?;
        let app_type = match raw.app_type.as_deref() {
            None => ApplicationType::default(),
            Some(name) => name.parse().unwrap_or_else(|_| {
                warn!(client_id = %raw.client_id, app_type = name, "unrecognised application type");
                ApplicationType::default()
            }),
        };
        Ok(Application {
            key: K::parse_key(&raw.client_id)?,
            name: raw.name,
            description: raw.description,
            app_type,
            grant_types: raw.grant_types.unwrap_or_default(),
            client_secret: raw.client_secret,
            callbacks: raw.callbacks.unwrap_or_default(),
            is_first_party: raw.is_first_party,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RemoteScope {
    value: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RemoteResourceServer {
    id: String,
    name: Option<String>,
    identifier: String,
    scopes: Option<Vec<RemoteScope>>,
    signing_alg: Option<String>,
    token_lifetime: Option<u32>,
}

impl<K: Key> RemoteEntity for ApiResource<K> {
    const COLLECTION: &'static str = "resource-servers";
    const KEY_FIELD: &'static str = "id";

    fn from_remote(value: Value) -> DomainResult<Self> {
        let raw: RemoteResourceServer = decode(EntityKind::ApiResource, value)?;
        Ok(ApiResource {
            key: K::parse_key(&raw.id)?,
            name: raw.name.unwrap_or_else(|| raw.identifier.clone()),
            identifier: raw.identifier,
            scopes: raw
                .scopes
                .unwrap_or_default()
                .into_iter()
                .map(|s| ApiScope {
                    value: s.value,
                    description: s.description,
                })
                .collect(),
            signing_alg: raw.signing_alg,
            token_lifetime: raw.token_lifetime,
        })
    }
}
