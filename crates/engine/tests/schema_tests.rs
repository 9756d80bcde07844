//! Schema bootstrap against a private store

use paperclub_common::config::{AppConfig, DatabaseConfig};
use paperclub_common::db::schema;
use paperclub_common::DbPool;
use paperclub_engine::Engine;
use sea_orm::DbBackend;
use tokio_test::assert_ok;

async fn empty_store() -> DbPool {
    DbPool::new(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory store")
}

#[tokio::test]
async fn test_create_and_drop() {
    let db = empty_store().await;
    assert_ok!(db.ping().await);

    assert!(!schema::schema_installed(db.write()).await.unwrap());

    assert_ok!(schema::create_schema(db.write()).await);
    assert!(schema::schema_installed(db.write()).await.unwrap());

    // Idempotent
    assert_ok!(schema::create_schema(db.write()).await);
    assert_ok!(schema::ensure_schema(db.write()).await);

    assert_ok!(schema::drop_schema(db.write()).await);
    assert!(!schema::schema_installed(db.write()).await.unwrap());
}

#[tokio::test]
async fn test_reset_clears_data() {
    let db = empty_store().await;
    let engine = Engine::new(db.clone(), &Default::default());
    assert_ok!(engine.bootstrap().await);

    assert_ok!(engine.identity.register("alice", "pw").await);
    assert!(engine.identity.user_exists("alice").await.unwrap());

    assert_ok!(schema::reset_schema(db.write()).await);

    assert!(schema::schema_installed(db.write()).await.unwrap());
    assert!(!engine.identity.user_exists("alice").await.unwrap());
}

#[tokio::test]
async fn test_connect_bootstraps() {
    let config = AppConfig {
        database: DatabaseConfig::in_memory(),
        ..AppConfig::default()
    };

    let engine = assert_ok!(Engine::connect(&config).await);
    assert!(schema::schema_installed(engine.pool().write()).await.unwrap());
    assert!(engine.feed.timeline_all(None).await.unwrap().is_empty());
    assert_eq!(engine.pool().backend(), DbBackend::Sqlite);
    assert!(!paperclub_common::VERSION.is_empty());
}
