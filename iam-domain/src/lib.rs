/*!
# IAM Domain

Identity-and-access-management facade using hexagonal architecture principles.

This crate provides:
- Entity models for users, client grants, applications and API resources
- A generic `Store` port with in-memory and Auth0 Management API variants
- Operation mappers that turn models into store-specific payloads
- Managers: thin pass-through services over a store, one per entity family

## Architecture

```text
┌─────────────────────────────────────────────────────────────┐
│                Application Layer                            │
├─────────────────────────────────────────────────────────────┤
│  • EntityManager<M, S>      • UserManager<M, S>             │
│  • GrantManager / ApplicationManager / ApiManager           │
└─────────────────────────────────────────────────────────────┘
                              │
┌─────────────────────────────────────────────────────────────┐
│                 Domain Layer (Ports)                        │
├─────────────────────────────────────────────────────────────┤
│  • Store / UserStore        • OperationMapper               │
│  • ManagementApi            • TokenManager / TokenSource    │
│  • ConfigurationPort                                        │
└─────────────────────────────────────────────────────────────┘
                              │
┌─────────────────────────────────────────────────────────────┐
│              Infrastructure Layer (Adapters)                │
├─────────────────────────────────────────────────────────────┤
│  • InMemoryStore            • Auth0Store + mappers          │
│  • Auth0RestClient          • Auth0TokenManager             │
│  • EnvConfigurationAdapter  • ManagerBuilder / facades      │
└─────────────────────────────────────────────────────────────┘
```

## Usage

```rust,no_run
use iam_domain::{infrastructure::wiring::InMemoryManagers, IdentityMapper, User, EntityKey};

# async fn run() -> iam_domain::DomainResult<()> {
let managers = InMemoryManagers::new();

let user = User::new(EntityKey::new("U1")?).with_email("a@b.com");
let key = managers.users.create(&user, &IdentityMapper).await?;

let found = managers.users.get_by_email("a@b.com").await?;
assert_eq!(found[0].key, key);
# Ok(())
# }
```

Backend selection follows `STORE_BACKEND`, `STORE_LIFETIME` and
`STORE_DELETE_POLICY`:

```rust,no_run
use iam_domain::infrastructure::wiring::Managers;

# fn run() -> iam_domain::DomainResult<()> {
match Managers::from_env()? {
    Managers::InMemory(_managers) => { /* local stores */ }
    Managers::Auth0(_managers) => { /* tenant-backed stores */ }
}
# Ok(())
# }
```
*/

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::ports::*;
pub use application::services::*;
pub use domain::entities::*;
pub use domain::errors::*;
