//! Collaborative recommendations
//!
//! A user's cohort is the set of other users who liked the most papers in
//! common with them. Candidates are papers the cohort liked that the user has
//! not, ranked by how many cohort members liked each one.

use crate::query::{fetch_all, limit};
use paperclub_common::config::FeedConfig;
use paperclub_common::db::CohortMember;
use paperclub_common::errors::Result;
use paperclub_common::metrics::QueryTimer;
use paperclub_common::{DbPool, PaperView};
use tracing::debug;

/// `$1` target user, `$2` cohort size
const COHORT: &str = "\
    SELECT other.username AS username, COUNT(*) AS shared_likes \
    FROM likes mine \
    JOIN likes other ON other.pid = mine.pid AND other.username <> mine.username \
    WHERE mine.username = $1 \
    GROUP BY other.username \
    ORDER BY shared_likes DESC, other.username ASC \
    LIMIT $2";

/// Recommendation service
#[derive(Clone)]
pub struct Recommender {
    db: DbPool,
    config: FeedConfig,
}

impl Recommender {
    pub fn new(db: DbPool, config: FeedConfig) -> Self {
        Self { db, config }
    }

    /// Up to `cohort_size` users most similar to `username`
    pub async fn cohort(&self, username: &str) -> Result<Vec<CohortMember>> {
        fetch_all(
            self.db.read(),
            COHORT,
            vec![username.into(), limit(self.config.cohort_size)],
        )
        .await
    }

    /// Papers liked by the cohort and not yet by `username`.
    ///
    /// A user with no likes has no cohort and gets nothing.
    pub async fn recommend(&self, username: &str, max: Option<u64>) -> Result<Vec<PaperView>> {
        let timer = QueryTimer::start("recommend");

        let sql = format!(
            "WITH cohort AS ({COHORT}) \
             SELECT p.pid, p.username, p.title, p.begin_time, p.description, \
                    COUNT(DISTINCT l.username) AS cohort_likes \
             FROM likes l \
             JOIN cohort c ON c.username = l.username \
             JOIN papers p ON p.pid = l.pid \
             WHERE l.pid NOT IN (SELECT mine.pid FROM likes mine WHERE mine.username = $1) \
             GROUP BY p.pid, p.username, p.title, p.begin_time, p.description \
             ORDER BY cohort_likes DESC, p.pid ASC \
             LIMIT $3"
        );

        let papers: Vec<PaperView> = fetch_all(
            self.db.read(),
            &sql,
            vec![
                username.into(),
                limit(self.config.cohort_size),
                limit(self.config.resolve_limit(max)),
            ],
        )
        .await?;

        debug!(username = %username, rows = papers.len(), "Recommendations ranked");
        timer.finish(papers.len());

        Ok(papers)
    }
}
