use iam_domain::{
    application::{ports::*, services::*},
    domain::{entities::*, errors::DomainError},
    infrastructure::{adapters::InMemoryStore, wiring::*},
};
use std::sync::Arc;

fn key(id: &str) -> EntityKey {
    EntityKey::new(id).unwrap()
}

fn grant_manager() -> GrantManager<InMemoryStore<Grant>> {
    ManagerBuilder::in_memory().build()
}

#[tokio::test]
async fn created_user_is_found_by_key_and_email() {
    let managers = InMemoryManagers::new();
    let user = User::new(key("U1")).with_email("a@b.com");

    let created = managers.users.create(&user, &IdentityMapper).await.unwrap();
    assert_eq!(created, key("U1"));
    assert_eq!(managers.users.get_by_key(&key("U1")).await.unwrap(), user);

    let by_email = managers.users.get_by_email("a@b.com").await.unwrap();
    assert_eq!(by_email, vec![user]);

    let err = managers.users.create(&User::new(key("U1")), &IdentityMapper).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict { kind: EntityKind::User, ref key } if key == "U1"));

    managers.users.delete_by_key(&key("U1")).await.unwrap();
    assert!(managers.users.get_by_key(&key("U1")).await.unwrap_err().is_not_found());
    assert!(managers.users.get_by_email("a@b.com").await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_keys_are_not_found() {
    let manager = grant_manager();
    let missing = key("cgr_missing");
    let grant = Grant::new(missing.clone(), "app", "https://api");

    assert!(manager.get_by_key(&missing).await.unwrap_err().is_not_found());
    assert!(manager
        .update(&missing, &grant, &IdentityMapper)
        .await
        .unwrap_err()
        .is_not_found());
    assert!(manager.delete_by_key(&missing).await.unwrap_err().is_not_found());
    assert!(manager.store().is_empty().await);
}

#[tokio::test]
async fn update_replaces_attributes() {
    let managers = InMemoryManagers::new();
    let app = Application::machine_to_machine(key("app_1"), "Reporting");
    managers.applications.create(&app, &IdentityMapper).await.unwrap();

    let renamed = Application::new(key("app_1"), "Reporting v2", ApplicationType::RegularWeb)
        .with_callbacks(["https://reports.example.com/callback"]);
    managers
        .applications
        .update(&key("app_1"), &renamed, &IdentityMapper)
        .await
        .unwrap();

    let stored = managers.applications.get_by_key(&key("app_1")).await.unwrap();
    assert_eq!(stored, renamed);
    assert!(stored.grant_types.is_empty());
}

#[tokio::test]
async fn failed_create_leaves_store_unchanged() {
    let manager = grant_manager();
    let original = Grant::new(key("cgr_1"), "app", "https://api").with_scopes(["read"]);
    manager.create(&original, &IdentityMapper).await.unwrap();

    let duplicate = Grant::new(key("cgr_1"), "other", "https://other");
    assert!(manager
        .create(&duplicate, &IdentityMapper)
        .await
        .unwrap_err()
        .is_conflict());
    assert_eq!(manager.get_by_key(&key("cgr_1")).await.unwrap(), original);
    assert_eq!(manager.store().len().await, 1);
}

#[tokio::test]
async fn concurrent_creates_for_one_key_yield_one_success() {
    let manager = grant_manager();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let manager = manager.clone();
            tokio::spawn(async move {
                let grant = Grant::new(key("cgr_race"), format!("client-{i}"), "https://api");
                manager.create(&grant, &IdentityMapper).await
            })
        })
        .collect();

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(e) if e.is_conflict() => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 15);
    assert_eq!(manager.store().len().await, 1);
}

#[tokio::test]
async fn api_resources_round_trip() {
    let managers = InMemoryManagers::new();
    let api = ApiResource::new(key("rs_1"), "Orders", "https://orders")
        .with_scope(ApiScope::new("read:orders"));

    managers.apis.create(&api, &IdentityMapper).await.unwrap();
    assert_eq!(managers.apis.get_by_key(&key("rs_1")).await.unwrap(), api);
}

#[tokio::test]
async fn idempotent_facade_ignores_missing_deletes() {
    let managers = InMemoryManagers::with_delete_policy(DeletePolicy::Idempotent);
    assert!(managers.grants.delete_by_key(&key("cgr_missing")).await.is_ok());
    assert!(managers.users.delete_by_key(&key("U404")).await.is_ok());
}

#[tokio::test]
async fn shared_managers_see_each_others_writes() {
    let builder = ManagerBuilder::<User, _>::in_memory();
    let first = builder.build_user_manager();
    let second = builder.build_user_manager();

    first
        .create(&User::new(key("U1")).with_email("a@b.com"), &IdentityMapper)
        .await
        .unwrap();
    assert_eq!(second.get_by_email("A@B.COM").await.unwrap().len(), 1);

    let isolated = ManagerBuilder::<User, _>::in_memory()
        .lifetime(ServiceLifetime::PerManager)
        .build_user_manager();
    assert!(isolated.get_by_email("a@b.com").await.unwrap().is_empty());
}

#[tokio::test]
async fn uuid_keyed_users() {
    let store = Arc::new(InMemoryStore::<User<uuid::Uuid>>::new());
    let manager = UserManager::new(Arc::clone(&store));
    let id = uuid::Uuid::new_v4();

    let created = manager
        .create(&User::new(id).with_email("u@example.com"), &IdentityMapper)
        .await
        .unwrap();
    assert_eq!(created, id);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn mapper_errors_are_returned_unchanged() {
    struct RejectAll;

    impl OperationMapper<Grant> for RejectAll {
        type Payload = Grant;

        fn map(&self, _model: &Grant) -> iam_domain::DomainResult<Grant> {
            Err(DomainError::validation("scope", "rejected"))
        }
    }

    let manager = grant_manager();
    let err = manager
        .create(&Grant::new(key("cgr_1"), "app", "https://api"), &RejectAll)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "scope"));
    assert!(manager.store().is_empty().await);
}
