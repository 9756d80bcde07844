//! Cohort selection and collaborative recommendations

mod common;

use common::*;
use paperclub_common::config::FeedConfig;
use paperclub_engine::{Engine, Recommender};
use tokio_test::assert_ok;

/// erin posts four papers; the others like them:
///
/// | user  | likes      |
/// |-------|------------|
/// | alice | p1         |
/// | bob   | p1 p2 p3   |
/// | carol | p1 p3      |
/// | dave  | p4         |
async fn fixture() -> (Engine, [i32; 4]) {
    let engine = engine().await;
    for name in ["alice", "bob", "carol", "dave", "erin"] {
        register(&engine, name).await;
    }

    let p1 = post_at(&engine, "erin", "p1", at(1)).await;
    let p2 = post_at(&engine, "erin", "p2", at(2)).await;
    let p3 = post_at(&engine, "erin", "p3", at(3)).await;
    let p4 = post_at(&engine, "erin", "p4", at(4)).await;

    let likes = [
        ("alice", p1),
        ("bob", p1),
        ("bob", p2),
        ("bob", p3),
        ("carol", p1),
        ("carol", p3),
        ("dave", p4),
    ];
    for (user, pid) in likes {
        assert_ok!(engine.social.like(user, pid).await);
    }

    (engine, [p1, p2, p3, p4])
}

#[tokio::test]
async fn test_cohort() {
    let (engine, _) = fixture().await;

    let cohort = engine.recommend.cohort("alice").await.unwrap();
    let members: Vec<(&str, i64)> = cohort
        .iter()
        .map(|m| (m.username.as_str(), m.shared_likes))
        .collect();

    // dave shares nothing with alice; ties go to the smaller username
    assert_eq!(members, vec![("bob", 1), ("carol", 1)]);

    let cohort = engine.recommend.cohort("carol").await.unwrap();
    let members: Vec<(&str, i64)> = cohort
        .iter()
        .map(|m| (m.username.as_str(), m.shared_likes))
        .collect();
    assert_eq!(members, vec![("bob", 2), ("alice", 1)]);
}

#[tokio::test]
async fn test_recommend_ranks_by_cohort_likes() {
    let (engine, [p1, p2, p3, p4]) = fixture().await;

    let recommended = pids(&engine.recommend.recommend("alice", None).await.unwrap());

    assert_eq!(recommended, vec![p3, p2]);
    assert!(!recommended.contains(&p1), "already liked");
    assert!(!recommended.contains(&p4), "dave is not in the cohort");
}

#[tokio::test]
async fn test_recommend_limit() {
    let (engine, [_, _, p3, _]) = fixture().await;

    let recommended = pids(&engine.recommend.recommend("alice", Some(1)).await.unwrap());
    assert_eq!(recommended, vec![p3]);

    assert!(engine.recommend.recommend("alice", Some(0)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_user_without_likes_gets_nothing() {
    let (engine, _) = fixture().await;

    assert!(engine.recommend.cohort("erin").await.unwrap().is_empty());
    assert!(engine.recommend.recommend("erin", None).await.unwrap().is_empty());
    assert!(engine.recommend.recommend("nobody", None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cohort_size_caps_members() {
    let (engine, [p1, p2, _, _]) = fixture().await;

    let config = FeedConfig {
        cohort_size: 1,
        ..FeedConfig::default()
    };
    let recommender = Recommender::new(engine.pool().clone(), config);

    let cohort = recommender.cohort("alice").await.unwrap();
    assert_eq!(cohort.len(), 1);
    assert_eq!(cohort[0].username, "bob");

    // Only bob's likes count now: p2 and p3 tie on one like each
    let recommended = pids(&recommender.recommend("alice", None).await.unwrap());
    assert_eq!(recommended.len(), 2);
    assert_eq!(recommended[0], p2);
    assert!(!recommended.contains(&p1));
}
