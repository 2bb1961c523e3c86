use super::common::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of registered application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationType {
    /// Machine-to-machine application
    #[default]
    NonInteractive,
    RegularWeb,
    Spa,
    Native,
}

impl ApplicationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationType::NonInteractive => "non_interactive",
            ApplicationType::RegularWeb => "regular_web",
            ApplicationType::Spa => "spa",
            ApplicationType::Native => "native",
        }
    }
}

impl fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ApplicationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "non_interactive" => Ok(ApplicationType::NonInteractive),
            "regular_web" => Ok(ApplicationType::RegularWeb),
            "spa" => Ok(ApplicationType::Spa),
            "native" => Ok(ApplicationType::Native),
            _ => Err(format!("Invalid application type: {s}")),
        }
    }
}

/// Domain entity representing a registered application (client).
///
/// The key is the application's client id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application<K = EntityKey> {
    pub key: K,
    pub name: String,
    pub description: Option<String>,
    pub app_type: ApplicationType,
    #[serde(default)]
    pub grant_types: Vec<String>,
    pub client_secret: Option<String>,
    #[serde(default)]
    pub callbacks: Vec<String>,
    pub is_first_party: bool,
}

impl<K: Key> Application<K> {
    pub fn new(key: K, name: impl Into<String>, app_type: ApplicationType) -> Self {
        Self {
            key,
            name: name.into(),
            description: None,
            app_type,
            grant_types: Vec::new(),
            client_secret: None,
            callbacks: Vec::new(),
            is_first_party: true,
        }
    }

    /// Application that authenticates with its own credentials
    pub fn machine_to_machine(key: K, name: impl Into<String>) -> Self {
        let mut app = Self::new(key, name, ApplicationType::NonInteractive);
        app.grant_types = vec!["client_credentials".to_string()];
        app
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_grant_types<I, S>(mut self, grant_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grant_types = grant_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_callbacks<I, S>(mut self, callbacks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.callbacks = callbacks.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_machine_to_machine(&self) -> bool {
        self.app_type == ApplicationType::NonInteractive
    }
}

impl<K: Key> Entity for Application<K> {
    type Key = K;

    fn kind() -> EntityKind {
        EntityKind::Application
    }

    fn key(&self) -> &K {
        &self.key
    }
}
