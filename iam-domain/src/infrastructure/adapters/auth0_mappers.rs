//! Operation mappers producing Auth0 Management API request bodies.
//!
//! Create mappers for families whose key the provider assigns (grants,
//! applications, APIs) leave the key out. Update mappers never send the key
//! or attributes the provider treats as immutable.
//!
//! Updates replace the whole model: an optional profile attribute that is
//! `None` is sent as `null` so the provider clears it. Write-only credentials
//! (user password, client secret) are only sent when set; `None` means "keep
//! the current credential".

use serde_json::{json, Map, Value};

use crate::application::ports::OperationMapper;
use crate::domain::{entities::*, errors::*};

fn insert_opt(body: &mut Map<String, Value>, field: &str, value: &Option<String>) {
    if let Some(v) = value {
        body.insert(field.to_string(), Value::String(v.clone()));
    }
}

fn insert_or_null(body: &mut Map<String, Value>, field: &str, value: &Option<String>) {
    let value = value.as_ref().map_or(Value::Null, |v| Value::String(v.clone()));
    body.insert(field.to_string(), value);
}

fn require<'a>(field: &str, value: Option<&'a str>) -> DomainResult<&'a str> {
    let value = value.unwrap_or_default();
    require_non_empty(field, value)?;
    Ok(value)
}

/// Body for `POST /users`
#[derive(Debug, Clone, Default)]
pub struct CreateUserMapper {
    default_connection: Option<String>,
}

impl CreateUserMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connection used when the model names none
    pub fn with_default_connection(connection: impl Into<String>) -> Self {
        Self {
            default_connection: Some(connection.into()),
        }
    }
}

impl<K: Key> OperationMapper<User<K>> for CreateUserMapper {
    type Payload = Value;

    fn map(&self, user: &User<K>) -> DomainResult<Value> {
        let connection = require(
            "connection",
            user.connection
                .as_deref()
                .or(self.default_connection.as_deref()),
        )?;
        let email = require("email", user.email.as_deref())?;
        User::validate_email(email)?;
        let password = require("password", user.password.as_deref())?;

        let mut body = Map::new();
        body.insert("user_id".to_string(), json!(user.key.to_string()));
        body.insert("connection".to_string(), json!(connection));
        body.insert("email".to_string(), json!(email));
        body.insert("password".to_string(), json!(password));
        body.insert("email_verified".to_string(), json!(user.email_verified));
        body.insert("blocked".to_string(), json!(user.blocked));
        insert_opt(&mut body, "name", &user.name);
        insert_opt(&mut body, "given_name", &user.given_name);
        insert_opt(&mut body, "family_name", &user.family_name);
        insert_opt(&mut body, "nickname", &user.nickname);
        if !user.user_metadata.is_empty() {
            body.insert("user_metadata".to_string(), Value::Object(user.user_metadata.clone()));
        }
        if !user.app_metadata.is_empty() {
            body.insert("app_metadata".to_string(), Value::Object(user.app_metadata.clone()));
        }
        Ok(Value::Object(body))
    }
}

/// Body for `PATCH /users/{id}`
#[derive(Debug, Clone, Default)]
pub struct UpdateUserMapper {
    default_connection: Option<String>,
}

impl UpdateUserMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_connection(connection: impl Into<String>) -> Self {
        Self {
            default_connection: Some(connection.into()),
        }
    }
}

impl<K: Key> OperationMapper<User<K>> for UpdateUserMapper {
    type Payload = Value;

    fn map(&self, user: &User<K>) -> DomainResult<Value> {
        let mut body = Map::new();

        body.insert("blocked".to_string(), json!(user.blocked));
        insert_or_null(&mut body, "name", &user.name);
        insert_or_null(&mut body, "given_name", &user.given_name);
        insert_or_null(&mut body, "family_name", &user.family_name);
        insert_or_null(&mut body, "nickname", &user.nickname);
        body.insert("user_metadata".to_string(), Value::Object(user.user_metadata.clone()));
        body.insert("app_metadata".to_string(), Value::Object(user.app_metadata.clone()));

        // the provider rejects a password change combined with email or
        // email_verified in one request
        if let Some(ref password) = user.password {
            body.insert("password".to_string(), json!(password));
        } else {
            if let Some(ref email) = user.email {
                User::validate_email(email)?;
                body.insert("email".to_string(), json!(email));
            }
            body.insert("email_verified".to_string(), json!(user.email_verified));
        }

        // the provider needs the connection whenever credentials or email change
        if body.contains_key("email") || body.contains_key("password") {
            let connection = require(
                "connection",
                user.connection
                    .as_deref()
                    .or(self.default_connection.as_deref()),
            )?;
            body.insert("connection".to_string(), json!(connection));
        }

        Ok(Value::Object(body))
    }
}

/// Body for `POST /client-grants`
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateGrantMapper;

impl<K: Key> OperationMapper<Grant<K>> for CreateGrantMapper {
    type Payload = Value;

    fn map(&self, grant: &Grant<K>) -> DomainResult<Value> {
        let client_id = require("client_id", Some(grant.client_id.as_str()))?;
        let audience = require("audience", Some(grant.audience.as_str()))?;
        Ok(json!({
            "client_id": client_id,
            "audience": audience,
            "scope": grant.scope,
        }))
    }
}

/// Body for `PATCH /client-grants/{id}`; only the scope is mutable
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateGrantMapper;

impl<K: Key> OperationMapper<Grant<K>> for UpdateGrantMapper {
    type Payload = Value;

    fn map(&self, grant: &Grant<K>) -> DomainResult<Value> {
        Ok(json!({ "scope": grant.scope }))
    }
}

fn application_body<K: Key>(app: &Application<K>) -> DomainResult<Map<String, Value>> {
    let name = require("name", Some(app.name.as_str()))?;

    let mut body = Map::new();
    body.insert("name".to_string(), json!(name));
    body.insert("app_type".to_string(), json!(app.app_type.as_str()));
    body.insert("grant_types".to_string(), json!(app.grant_types));
    body.insert("callbacks".to_string(), json!(app.callbacks));
    body.insert("is_first_party".to_string(), json!(app.is_first_party));
    insert_opt(&mut body, "description", &app.description);
    Ok(body)
}

/// Body for `POST /clients`
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateApplicationMapper;

impl<K: Key> OperationMapper<Application<K>> for CreateApplicationMapper {
    type Payload = Value;

    fn map(&self, app: &Application<K>) -> DomainResult<Value> {
        Ok(Value::Object(application_body(app)?))
    }
}

/// Body for `PATCH /clients/{client_id}`
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateApplicationMapper;

impl<K: Key> OperationMapper<Application<K>> for UpdateApplicationMapper {
    type Payload = Value;

    fn map(&self, app: &Application<K>) -> DomainResult<Value> {
        let mut body = application_body(app)?;
        insert_or_null(&mut body, "description", &app.description);
        insert_opt(&mut body, "client_secret", &app.client_secret);
        Ok(Value::Object(body))
    }
}

fn api_body<K: Key>(api: &ApiResource<K>) -> DomainResult<Map<String, Value>> {
    let name = require("name", Some(api.name.as_str()))?;

    let scopes: Vec<Value> = api
        .scopes
        .iter()
        .map(|s| {
            let mut scope = Map::new();
            scope.insert("value".to_string(), json!(s.value));
            insert_opt(&mut scope, "description", &s.description);
            Value::Object(scope)
        })
        .collect();

    let mut body = Map::new();
    body.insert("name".to_string(), json!(name));
    body.insert("scopes".to_string(), Value::Array(scopes));
    insert_opt(&mut body, "signing_alg", &api.signing_alg);
    if let Some(lifetime) = api.token_lifetime {
        body.insert("token_lifetime".to_string(), json!(lifetime));
    }
    Ok(body)
}

/// Body for `POST /resource-servers`
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateApiMapper;

impl<K: Key> OperationMapper<ApiResource<K>> for CreateApiMapper {
    type Payload = Value;

    fn map(&self, api: &ApiResource<K>) -> DomainResult<Value> {
        let identifier = require("identifier", Some(api.identifier.as_str()))?;
        let mut body = api_body(api)?;
        body.insert("identifier".to_string(), json!(identifier));
        Ok(Value::Object(body))
    }
}

/// Body for `PATCH /resource-servers/{id}`; the identifier is immutable
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateApiMapper;

impl<K: Key> OperationMapper<ApiResource<K>> for UpdateApiMapper {
    type Payload = Value;

    fn map(&self, api: &ApiResource<K>) -> DomainResult<Value> {
        Ok(Value::Object(api_body(api)?))
    }
}
