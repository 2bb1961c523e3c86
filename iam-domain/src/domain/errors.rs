use crate::domain::entities::EntityKind;
use thiserror::Error;

/// Domain-specific errors surfaced by managers and stores
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{kind} not found: {key}")]
    NotFound { kind: EntityKind, key: String },

    #[error("{kind} already exists: {key}")]
    Conflict { kind: EntityKind, key: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Backend error from {service}: {message}")]
    Backend {
        service: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl DomainError {
    pub fn not_found(kind: EntityKind, key: impl ToString) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub fn conflict(kind: EntityKind, key: impl ToString) -> Self {
        Self::Conflict {
            kind,
            key: key.to_string(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend { .. })
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors reported by a remote management API client
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Transport failure: {message}")]
    Transport { message: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Not authenticated: {reason}")]
    Unauthenticated { reason: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Translate a client failure for an operation on `key` of `kind`.
    ///
    /// 404 and 409 become `NotFound` and `Conflict`; anything else is passed on
    /// as an opaque backend error.
    pub fn into_domain(self, kind: EntityKind, key: impl ToString) -> DomainError {
        match self {
            ApiError::Status { status: 404, .. } => DomainError::not_found(kind, key),
            ApiError::Status { status: 409, .. } => DomainError::conflict(kind, key),
            other => other.into(),
        }
    }
}

impl From<ApiError> for DomainError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, message } => DomainError::Backend {
                service: "Auth0".to_string(),
                status: Some(status),
                message,
            },
            ApiError::Transport { message } => DomainError::Backend {
                service: "Auth0".to_string(),
                status: None,
                message,
            },
            ApiError::Decode { message } => DomainError::Serialization { message },
            ApiError::Unauthenticated { reason } => DomainError::AuthenticationFailed { reason },
        }
    }
}

/// Token acquisition errors
#[derive(Error, Debug, Clone)]
pub enum AuthError {
    #[error("Invalid client credentials")]
    InvalidCredentials,

    #[error("Token acquisition failed: {reason}")]
    TokenAcquisitionFailed { reason: String },
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => DomainError::AuthenticationFailed {
                reason: "Invalid client credentials".to_string(),
            },
            AuthError::TokenAcquisitionFailed { reason } => {
                DomainError::AuthenticationFailed { reason }
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthenticated {
            reason: err.to_string(),
        }
    }
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}")]
    MissingRequired { key: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl From<ConfigError> for DomainError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingRequired { key } => DomainError::Configuration {
                message: format!("Missing required configuration: {key}"),
            },
            ConfigError::InvalidValue { key, message } => DomainError::Configuration {
                message: format!("Invalid value for {key}: {message}"),
            },
        }
    }
}
