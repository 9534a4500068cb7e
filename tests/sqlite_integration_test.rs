//! Registry behaviour over the SQLite adapters, including restarts.

mod common;

use std::sync::Arc;

use common::{new_credential, temp_db_path};
use credswitch::adapters::signal::RecordingSignalSink;
use credswitch::adapters::sqlite::{initialize_database, SqliteSecretStore, SqliteTokenCache};
use credswitch::domain::models::{ActiveCredential, CachedToken, Environment, RegistryConfig};
use credswitch::domain::ports::TokenCache;
use credswitch::services::{CacheCoordinator, CredentialRegistry};
use sqlx::SqlitePool;

async fn open_registry(pool: &SqlitePool) -> (CredentialRegistry, Arc<SqliteTokenCache>) {
    let cache = Arc::new(SqliteTokenCache::new(pool.clone()));
    let coordinator = Arc::new(CacheCoordinator::new(
        cache.clone(),
        Arc::new(RecordingSignalSink::new()),
    ));
    let registry = CredentialRegistry::open(
        Arc::new(SqliteSecretStore::new(pool.clone())),
        coordinator,
        &RegistryConfig::default(),
    )
    .await
    .expect("open registry");
    (registry, cache)
}

#[tokio::test]
async fn test_active_pointer_survives_restart() {
    let (_dir, db_path) = temp_db_path();
    let url = format!("sqlite:{}", db_path.display());

    let pool = initialize_database(&url, None).await.unwrap();
    let (registry, _cache) = open_registry(&pool).await;
    let a = registry.create(new_credential("a", Environment::Sandbox)).await.unwrap();
    let b = registry.create(new_credential("b", Environment::Live)).await.unwrap();
    registry.switch_to(b.id).await.unwrap();
    drop(registry);
    pool.close().await;

    let pool = initialize_database(&url, None).await.unwrap();
    let (registry, _cache) = open_registry(&pool).await;

    assert_eq!(registry.active_id().await.unwrap(), Some(b.id));
    match registry.get_active().await.unwrap() {
        ActiveCredential::Configured(active) => {
            assert_eq!(active.id, b.id);
            assert_eq!(active.client_secret.expose(), "b-client-secret");
        }
        ActiveCredential::NotConfigured => panic!("expected an active credential set"),
    }

    let names: Vec<String> = registry
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.credential.name)
        .collect();
    assert_eq!(names, ["a", "b"]);

    registry.delete(a.id).await.unwrap();
    assert_eq!(registry.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_registries_sharing_a_database_agree_on_the_pointer() {
    let (_dir, db_path) = temp_db_path();
    let url = format!("sqlite:{}", db_path.display());

    // two pools stand in for two processes over the same file
    let server_pool = initialize_database(&url, None).await.unwrap();
    let cli_pool = initialize_database(&url, None).await.unwrap();
    let (server, _) = open_registry(&server_pool).await;
    let (cli, _) = open_registry(&cli_pool).await;

    let a = server.create(new_credential("a", Environment::Sandbox)).await.unwrap();
    let b = server.create(new_credential("b", Environment::Live)).await.unwrap();
    server.switch_to(a.id).await.unwrap();

    let outcome = cli.switch_to(b.id).await.unwrap();
    assert_eq!(outcome.previous, Some(a.id));

    assert_eq!(server.active_id().await.unwrap(), Some(b.id));
    match server.get_active().await.unwrap() {
        ActiveCredential::Configured(active) => assert_eq!(active.id, b.id),
        ActiveCredential::NotConfigured => panic!("expected b to be active"),
    }
    let flagged: Vec<_> = server
        .list()
        .await
        .unwrap()
        .into_iter()
        .filter(|l| l.is_active)
        .map(|l| l.credential.id)
        .collect();
    assert_eq!(flagged, [b.id]);

    let err = server.delete(b.id).await.unwrap_err();
    assert_eq!(err.kind(), credswitch::ErrorKind::ActiveCredential);
    server.delete(a.id).await.unwrap();
}

#[tokio::test]
async fn test_switch_evicts_persisted_token() {
    let (_dir, db_path) = temp_db_path();
    let url = format!("sqlite:{}", db_path.display());
    let pool = initialize_database(&url, None).await.unwrap();
    let (registry, cache) = open_registry(&pool).await;

    let a = registry.create(new_credential("a", Environment::Sandbox)).await.unwrap();
    let b = registry.create(new_credential("b", Environment::Live)).await.unwrap();
    registry.switch_to(a.id).await.unwrap();
    cache
        .put(CachedToken::new(a.id, "tok-a", Environment::Sandbox, chrono::Duration::minutes(5)))
        .await
        .unwrap();

    // a second process sharing the database sees the token
    let other = SqliteTokenCache::new(pool.clone());
    assert!(other.get(a.id).await.unwrap().is_some());

    registry.switch_to(b.id).await.unwrap();

    assert!(other.get(a.id).await.unwrap().is_none());
    assert!(cache.get(a.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_closed_database_fails_switch_without_moving_pointer() {
    let (_dir, db_path) = temp_db_path();
    let url = format!("sqlite:{}", db_path.display());
    let pool = initialize_database(&url, None).await.unwrap();

    let store_pool = initialize_database(&url, None).await.unwrap();
    let cache = Arc::new(SqliteTokenCache::new(pool.clone()));
    let coordinator = Arc::new(CacheCoordinator::new(
        cache,
        Arc::new(RecordingSignalSink::new()),
    ));
    let registry = CredentialRegistry::open(
        Arc::new(SqliteSecretStore::new(store_pool)),
        coordinator,
        &RegistryConfig::default(),
    )
    .await
    .unwrap();
    let a = registry.create(new_credential("a", Environment::Sandbox)).await.unwrap();

    // the token cache's pool goes away, the secret store's does not
    pool.close().await;

    let err = registry.switch_to(a.id).await.unwrap_err();
    assert_eq!(err.kind(), credswitch::ErrorKind::CacheUnavailable);
    assert_eq!(registry.active_id().await.unwrap(), None);
}
