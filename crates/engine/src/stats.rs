//! Activity and tag statistics

use crate::query::{fetch_all, fetch_count, limit};
use paperclub_common::config::FeedConfig;
use paperclub_common::db::{TagCount, TagPair, UserActivity, UserSummary};
use paperclub_common::errors::Result;
use paperclub_common::metrics::QueryTimer;
use paperclub_common::DbPool;
use sea_orm::Value;

/// Statistics service
#[derive(Clone)]
pub struct StatsService {
    db: DbPool,
    config: FeedConfig,
}

impl StatsService {
    pub fn new(db: DbPool, config: FeedConfig) -> Self {
        Self { db, config }
    }

    /// Users ranked by papers posted. Users without papers are left out.
    pub async fn most_active_users(&self, max: Option<u64>) -> Result<Vec<UserActivity>> {
        let sql = "SELECT p.username AS username, COUNT(*) AS paper_count \
                   FROM papers p \
                   GROUP BY p.username \
                   ORDER BY paper_count DESC, p.username ASC \
                   LIMIT $1";

        self.ranked("most_active_users", sql, vec![self.limit(max)]).await
    }

    /// Tags ranked by the number of papers carrying them
    pub async fn most_popular_tags(&self, max: Option<u64>) -> Result<Vec<TagCount>> {
        let sql = "SELECT t.tagname AS tag, COUNT(*) AS paper_count \
                   FROM tags t \
                   GROUP BY t.tagname \
                   ORDER BY paper_count DESC, t.tagname ASC \
                   LIMIT $1";

        self.ranked("most_popular_tags", sql, vec![self.limit(max)]).await
    }

    /// Pairs of distinct tags found on the same paper, each pair once with
    /// `first_tag < second_tag`
    pub async fn most_popular_tag_pairs(&self, max: Option<u64>) -> Result<Vec<TagPair>> {
        let sql = "SELECT a.tagname AS first_tag, b.tagname AS second_tag, COUNT(*) AS paper_count \
                   FROM tags a \
                   JOIN tags b ON b.pid = a.pid AND a.tagname < b.tagname \
                   GROUP BY a.tagname, b.tagname \
                   ORDER BY paper_count DESC, a.tagname ASC, b.tagname ASC \
                   LIMIT $1";

        self.ranked("most_popular_tag_pairs", sql, vec![self.limit(max)]).await
    }

    pub async fn papers_posted(&self, username: &str) -> Result<u64> {
        fetch_count(
            self.db.read(),
            "SELECT COUNT(*) AS n FROM papers WHERE username = $1",
            vec![username.into()],
        )
        .await
    }

    pub async fn likes_given(&self, username: &str) -> Result<u64> {
        fetch_count(
            self.db.read(),
            "SELECT COUNT(*) AS n FROM likes WHERE username = $1",
            vec![username.into()],
        )
        .await
    }

    /// Number of different tags across all of a user's papers
    pub async fn distinct_tags_used(&self, username: &str) -> Result<u64> {
        fetch_count(
            self.db.read(),
            "SELECT COUNT(DISTINCT t.tagname) AS n \
             FROM tags t JOIN papers p ON p.pid = t.pid \
             WHERE p.username = $1",
            vec![username.into()],
        )
        .await
    }

    /// All per-user counters. An unknown user reads as all zeros.
    pub async fn user_summary(&self, username: &str) -> Result<UserSummary> {
        Ok(UserSummary {
            papers_posted: self.papers_posted(username).await?,
            likes_given: self.likes_given(username).await?,
            distinct_tags_used: self.distinct_tags_used(username).await?,
        })
    }

    fn limit(&self, max: Option<u64>) -> Value {
        limit(self.config.resolve_limit(max))
    }

    async fn ranked<T>(&self, view: &'static str, sql: &str, values: Vec<Value>) -> Result<Vec<T>>
    where
        T: sea_orm::FromQueryResult,
    {
        let timer = QueryTimer::start(view);
        let rows: Vec<T> = fetch_all(self.db.read(), sql, values).await?;
        timer.finish(rows.len());
        Ok(rows)
    }
}
