//! Shared fixtures: every test gets its own store, in memory unless it needs
//! several connections

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use paperclub_common::config::{DatabaseConfig, FeedConfig};
use paperclub_common::db::models::*;
use paperclub_common::db::schema;
use paperclub_common::DbPool;
use paperclub_engine::{Engine, NewPaper};
use sea_orm::{ActiveValue::NotSet, EntityTrait, Set};
use tempfile::TempDir;

pub const PASSWORD: &str = "correct horse";

/// Fresh engine over a private in-memory SQLite store
pub async fn engine() -> Engine {
    let db = DbPool::new(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory store");
    schema::create_schema(db.write()).await.expect("schema");
    Engine::new(db, &FeedConfig::default())
}

/// Fresh engine over a SQLite file with a pool of `max_connections`, so
/// concurrent calls really contend for the store. Keep the directory alive for
/// as long as the engine.
pub async fn file_engine(max_connections: u32) -> (Engine, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("paperclub.db");

    let config = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        max_connections,
        ..DatabaseConfig::in_memory()
    };

    let db = DbPool::new(&config).await.expect("file store");
    schema::create_schema(db.write()).await.expect("schema");
    (Engine::new(db, &FeedConfig::default()), dir)
}

pub async fn register(engine: &Engine, username: &str) {
    engine
        .identity
        .register(username, PASSWORD)
        .await
        .expect("register");
}

/// Post a paper through the catalog, stamped with the current time
pub async fn post(engine: &Engine, owner: &str, title: &str, tags: &[&str]) -> i32 {
    let paper = NewPaper::new(title, &format!("About {}", title), "").with_tags(tags);
    engine.papers.add_paper(owner, paper).await.expect("add paper")
}

/// Insert a paper with an explicit creation time
pub async fn post_at(engine: &Engine, owner: &str, title: &str, begin_time: DateTime<Utc>) -> i32 {
    post_with(engine, owner, title, "", "", begin_time).await
}

pub async fn post_with(
    engine: &Engine,
    owner: &str,
    title: &str,
    description: &str,
    content: &str,
    begin_time: DateTime<Utc>,
) -> i32 {
    let model = PaperActiveModel {
        pid: NotSet,
        username: Set(owner.to_string()),
        title: Set(title.to_string()),
        description: Set(description.to_string()),
        begin_time: Set(begin_time),
        content: Set(content.to_string()),
    };

    PaperEntity::insert(model)
        .exec(engine.pool().write())
        .await
        .expect("insert paper")
        .last_insert_id
}

/// Record a like with an explicit like time
pub async fn like_at(engine: &Engine, username: &str, pid: i32, like_time: DateTime<Utc>) {
    let model = LikeActiveModel {
        pid: Set(pid),
        username: Set(username.to_string()),
        like_time: Set(like_time),
    };

    LikeEntity::insert(model)
        .exec_without_returning(engine.pool().write())
        .await
        .expect("insert like");
}

/// Midnight UTC on 1 January 2024, plus `minutes`
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::minutes(minutes)
}

pub fn pids(papers: &[paperclub_common::PaperView]) -> Vec<i32> {
    papers.iter().map(|p| p.pid).collect()
}
