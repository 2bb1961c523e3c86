//! Construction of managers over concrete stores.

use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};
use tracing::info;

use crate::application::ports::*;
use crate::application::services::*;
use crate::domain::{entities::*, errors::*};
use crate::infrastructure::adapters::*;

type StoreFactory<S> = Box<dyn Fn(DeletePolicy) -> S + Send + Sync>;

/// Builds managers for one entity family.
///
/// With [`ServiceLifetime::Shared`] every manager built shares one store
/// handle; with [`ServiceLifetime::PerManager`] each gets a fresh store.
pub struct ManagerBuilder<M, S> {
    make_store: StoreFactory<S>,
    lifetime: ServiceLifetime,
    delete_policy: DeletePolicy,
    shared: OnceLock<Arc<S>>,
    _marker: PhantomData<fn() -> M>,
}

impl<M: Entity> ManagerBuilder<M, InMemoryStore<M>> {
    pub fn in_memory() -> Self {
        Self::with_factory(InMemoryStore::with_delete_policy)
    }
}

impl<M: RemoteEntity> ManagerBuilder<M, Auth0Store<M>> {
    pub fn auth0(api: Arc<dyn ManagementApi>) -> Self {
        Self::with_factory(move |policy| Auth0Store::with_delete_policy(Arc::clone(&api), policy))
    }
}

impl<M: Entity, S: Store<M>> ManagerBuilder<M, S> {
    /// Builder over stores produced by `make_store`
    pub fn with_factory<F>(make_store: F) -> Self
    where
        F: Fn(DeletePolicy) -> S + Send + Sync + 'static,
    {
        Self {
            make_store: Box::new(make_store),
            lifetime: ServiceLifetime::default(),
            delete_policy: DeletePolicy::default(),
            shared: OnceLock::new(),
            _marker: PhantomData,
        }
    }

    pub fn lifetime(mut self, lifetime: ServiceLifetime) -> Self {
        self.lifetime = lifetime;
        self.shared = OnceLock::new();
        self
    }

    pub fn delete_policy(mut self, delete_policy: DeletePolicy) -> Self {
        self.delete_policy = delete_policy;
        self.shared = OnceLock::new();
        self
    }

    /// Apply the lifetime and delete policy of a loaded configuration
    pub fn configured(self, config: &StoreConfig) -> Self {
        self.lifetime(config.lifetime)
            .delete_policy(config.delete_policy)
    }

    fn store_handle(&self) -> Arc<S> {
        match self.lifetime {
            ServiceLifetime::Shared => Arc::clone(
                self.shared
                    .get_or_init(|| Arc::new((self.make_store)(self.delete_policy))),
            ),
            ServiceLifetime::PerManager => Arc::new((self.make_store)(self.delete_policy)),
        }
    }

    pub fn build(&self) -> EntityManager<M, S> {
        EntityManager::new(self.store_handle())
    }
}

impl<M: Entity + HasEmail, S: UserStore<M>> ManagerBuilder<M, S> {
    pub fn build_user_manager(&self) -> UserManager<M, S> {
        UserManager::new(self.store_handle())
    }
}

/// The four managers over in-memory stores
pub struct InMemoryManagers {
    pub users: UserManager<User, InMemoryStore<User>>,
    pub grants: GrantManager<InMemoryStore<Grant>>,
    pub applications: ApplicationManager<InMemoryStore<Application>>,
    pub apis: ApiManager<InMemoryStore<ApiResource>>,
}

impl InMemoryManagers {
    pub fn new() -> Self {
        Self::configured(&StoreConfig::default())
    }

    pub fn with_delete_policy(delete_policy: DeletePolicy) -> Self {
        Self::configured(&StoreConfig {
            delete_policy,
            ..StoreConfig::default()
        })
    }

    /// Managers following the lifetime and delete policy of `config`
    pub fn configured(config: &StoreConfig) -> Self {
        Self {
            users: ManagerBuilder::in_memory()
                .configured(config)
                .build_user_manager(),
            grants: ManagerBuilder::in_memory().configured(config).build(),
            applications: ManagerBuilder::in_memory().configured(config).build(),
            apis: ManagerBuilder::in_memory().configured(config).build(),
        }
    }
}

impl Default for InMemoryManagers {
    fn default() -> Self {
        Self::new()
    }
}

/// The four managers over the Auth0 Management API
pub struct Auth0Managers {
    pub users: UserManager<User, Auth0Store<User>>,
    pub grants: GrantManager<Auth0Store<Grant>>,
    pub applications: ApplicationManager<Auth0Store<Application>>,
    pub apis: ApiManager<Auth0Store<ApiResource>>,
    default_connection: Option<String>,
}

impl Auth0Managers {
    pub fn new(api: Arc<dyn ManagementApi>, delete_policy: DeletePolicy) -> Self {
        Self::with_store_config(
            api,
            &StoreConfig {
                backend: StoreBackend::Auth0,
                delete_policy,
                ..StoreConfig::default()
            },
        )
    }

    /// Managers over `api` following the lifetime and delete policy of `config`
    pub fn with_store_config(api: Arc<dyn ManagementApi>, config: &StoreConfig) -> Self {
        Self {
            users: ManagerBuilder::auth0(Arc::clone(&api))
                .configured(config)
                .build_user_manager(),
            grants: ManagerBuilder::auth0(Arc::clone(&api))
                .configured(config)
                .build(),
            applications: ManagerBuilder::auth0(Arc::clone(&api))
                .configured(config)
                .build(),
            apis: ManagerBuilder::auth0(api).configured(config).build(),
            default_connection: None,
        }
    }

    /// Connection new users land in when the model names none
    pub fn with_default_connection(mut self, connection: impl Into<String>) -> Self {
        self.default_connection = Some(connection.into());
        self
    }

    /// Wire the HTTP client, token source and REST client for the configured
    /// tenant.
    pub fn from_config(config: &dyn ConfigurationPort) -> DomainResult<Self> {
        let auth0 = config
            .get_auth0_config()
            .ok_or_else(|| ConfigError::MissingRequired {
                key: "AUTH0_DOMAIN".to_string(),
            })?;
        auth0.validate()?;
        config.get_auth_config().validate()?;
        config.get_http_config().validate()?;

        let client = build_http_client(config.get_http_config())?;
        let tokens = CachedTokenSource::from_config(auth0, config.get_auth_config(), client.clone())?;
        let api = Auth0RestClient::new(client, auth0.get_api_url(), Arc::new(tokens));

        info!(
            domain = %auth0.domain,
            environment = %config.get_environment(),
            "Wired Auth0 managers"
        );

        let managers = Self::with_store_config(Arc::new(api), config.get_store_config());
        Ok(match auth0.default_connection {
            Some(ref connection) => managers.with_default_connection(connection.clone()),
            None => managers,
        })
    }

    pub fn create_user_mapper(&self) -> CreateUserMapper {
        match self.default_connection {
            Some(ref connection) => CreateUserMapper::with_default_connection(connection.clone()),
            None => CreateUserMapper::new(),
        }
    }

    pub fn update_user_mapper(&self) -> UpdateUserMapper {
        match self.default_connection {
            Some(ref connection) => UpdateUserMapper::with_default_connection(connection.clone()),
            None => UpdateUserMapper::new(),
        }
    }
}

/// Managers over whichever backend the configuration selects
pub enum Managers {
    InMemory(InMemoryManagers),
    Auth0(Auth0Managers),
}

impl Managers {
    /// Build the managers `STORE_BACKEND` names, honouring `STORE_LIFETIME`
    /// and `STORE_DELETE_POLICY`.
    pub fn from_config(config: &dyn ConfigurationPort) -> DomainResult<Self> {
        config.validate()?;
        let store = config.get_store_config();
        let managers = match store.backend {
            StoreBackend::InMemory => Managers::InMemory(InMemoryManagers::configured(store)),
            StoreBackend::Auth0 => Managers::Auth0(Auth0Managers::from_config(config)?),
        };
        info!(
            backend = %store.backend,
            lifetime = ?store.lifetime,
            delete_policy = ?store.delete_policy,
            environment = %config.get_environment(),
            "Wired managers"
        );
        Ok(managers)
    }

    /// Load configuration from the process environment and wire managers
    pub fn from_env() -> DomainResult<Self> {
        Self::from_config(&EnvConfigurationAdapter::new()?)
    }

    pub fn backend(&self) -> StoreBackend {
        match self {
            Managers::InMemory(_) => StoreBackend::InMemory,
            Managers::Auth0(_) => StoreBackend::Auth0,
        }
    }
}
