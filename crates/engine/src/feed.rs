//! Feeds and rankings
//!
//! Every feed returns [`PaperView`] rows with a total order: the feed's primary
//! criterion first, then ascending paper id. Limits are clamped to the
//! configured maximum and a limit of 0 yields an empty feed.

use crate::query::{fetch_all, limit, PAPER_COLUMNS};
use crate::tags::sanitize_tag;
use chrono::{DateTime, Utc};
use paperclub_common::config::FeedConfig;
use paperclub_common::errors::{AppError, Result};
use paperclub_common::metrics::QueryTimer;
use paperclub_common::{DbPool, PaperView};
use sea_orm::{FromQueryResult, Value};
use tracing::debug;

/// Feed service
#[derive(Clone)]
pub struct FeedService {
    db: DbPool,
    config: FeedConfig,
}

/// A paper with its like count, before truncation
#[derive(Debug, FromQueryResult)]
struct RankedPaper {
    pid: i32,
    username: String,
    title: String,
    begin_time: DateTime<Utc>,
    description: String,
    like_count: i64,
}

impl From<RankedPaper> for PaperView {
    fn from(row: RankedPaper) -> Self {
        Self {
            pid: row.pid,
            username: row.username,
            title: row.title,
            begin_time: row.begin_time,
            description: row.description,
        }
    }
}

/// A paper with its searchable text
#[derive(Debug, FromQueryResult)]
struct SearchCandidate {
    pid: i32,
    username: String,
    title: String,
    begin_time: DateTime<Utc>,
    description: String,
    content: String,
}

impl SearchCandidate {
    /// `needle` must already be lowercased
    fn contains(&self, needle: &str) -> bool {
        [&self.title, &self.description, &self.content]
            .iter()
            .any(|text| text.to_lowercase().contains(needle))
    }
}

impl From<SearchCandidate> for PaperView {
    fn from(row: SearchCandidate) -> Self {
        Self {
            pid: row.pid,
            username: row.username,
            title: row.title,
            begin_time: row.begin_time,
            description: row.description,
        }
    }
}

impl FeedService {
    pub fn new(db: DbPool, config: FeedConfig) -> Self {
        Self { db, config }
    }

    /// Papers posted by `username`, newest first
    pub async fn timeline(&self, username: &str, max: Option<u64>) -> Result<Vec<PaperView>> {
        let sql = format!(
            "SELECT {PAPER_COLUMNS} FROM papers p \
             WHERE p.username = $1 \
             ORDER BY p.begin_time DESC, p.pid ASC \
             LIMIT $2"
        );

        self.run("timeline", &sql, vec![username.into(), self.limit(max)]).await
    }

    /// All papers, newest first
    pub async fn timeline_all(&self, max: Option<u64>) -> Result<Vec<PaperView>> {
        let sql = format!(
            "SELECT {PAPER_COLUMNS} FROM papers p \
             ORDER BY p.begin_time DESC, p.pid ASC \
             LIMIT $1"
        );

        self.run("timeline_all", &sql, vec![self.limit(max)]).await
    }

    /// Papers carrying a tag, newest first. The tag is sanitised before lookup.
    pub async fn by_tag(&self, tag: &str, max: Option<u64>) -> Result<Vec<PaperView>> {
        let tag = sanitize_tag(tag);
        if tag.is_empty() {
            return Err(AppError::validation("tag", "Tag is empty after sanitisation"));
        }

        let sql = format!(
            "SELECT {PAPER_COLUMNS} FROM papers p \
             JOIN tags t ON t.pid = p.pid \
             WHERE t.tagname = $1 \
             ORDER BY p.begin_time DESC, p.pid ASC \
             LIMIT $2"
        );

        self.run("by_tag", &sql, vec![tag.into(), self.limit(max)]).await
    }

    /// Papers whose title, description or full text contains `keyword`,
    /// ignoring case. Without a keyword this is [`timeline_all`](Self::timeline_all).
    ///
    /// Case folding happens here rather than in the store: SQLite's `LOWER`
    /// only folds ASCII, so a store-side match would miss "Émile" for "ÉMILE".
    pub async fn by_keyword(
        &self,
        keyword: Option<&str>,
        max: Option<u64>,
    ) -> Result<Vec<PaperView>> {
        let keyword = match keyword.map(str::trim) {
            Some(k) if !k.is_empty() => k,
            _ => return self.timeline_all(max).await,
        };

        let timer = QueryTimer::start("by_keyword");
        let max = usize::try_from(self.config.resolve_limit(max)).unwrap_or(usize::MAX);
        let needle = keyword.to_lowercase();

        let sql = format!(
            "SELECT {PAPER_COLUMNS}, p.content FROM papers p \
             ORDER BY p.begin_time DESC, p.pid ASC"
        );

        let candidates: Vec<SearchCandidate> = fetch_all(self.db.read(), &sql, vec![]).await?;
        let scanned = candidates.len();

        let papers: Vec<PaperView> = candidates
            .into_iter()
            .filter(|paper| paper.contains(&needle))
            .take(max)
            .map(PaperView::from)
            .collect();

        debug!(view = "by_keyword", scanned, rows = papers.len(), "Feed query");
        timer.finish(papers.len());

        Ok(papers)
    }

    /// Papers `username` liked, most recently liked first
    pub async fn by_liked_by(&self, username: &str, max: Option<u64>) -> Result<Vec<PaperView>> {
        let sql = format!(
            "SELECT {PAPER_COLUMNS} FROM likes l \
             JOIN papers p ON p.pid = l.pid \
             WHERE l.username = $1 \
             ORDER BY l.like_time DESC, p.pid ASC \
             LIMIT $2"
        );

        self.run("by_liked_by", &sql, vec![username.into(), self.limit(max)]).await
    }

    /// Papers posted strictly after `since`, most liked first.
    ///
    /// The ranking counts papers without likes too; the result is then cut at
    /// the first zero-like paper, so it may hold fewer than `max` rows even
    /// when more recent papers exist.
    pub async fn most_popular(
        &self,
        since: DateTime<Utc>,
        max: Option<u64>,
    ) -> Result<Vec<PaperView>> {
        let timer = QueryTimer::start("most_popular");

        let sql = "SELECT p.pid, p.username, p.title, p.begin_time, p.description, \
                          COUNT(l.pid) AS like_count \
                   FROM papers p \
                   LEFT JOIN likes l ON l.pid = p.pid \
                   WHERE p.begin_time > $1 \
                   GROUP BY p.pid, p.username, p.title, p.begin_time, p.description \
                   ORDER BY like_count DESC, p.pid ASC \
                   LIMIT $2";

        let ranked: Vec<RankedPaper> =
            fetch_all(self.db.read(), sql, vec![Value::from(since), self.limit(max)]).await?;

        let papers: Vec<PaperView> = ranked
            .into_iter()
            .take_while(|row| row.like_count > 0)
            .map(PaperView::from)
            .collect();

        timer.finish(papers.len());
        Ok(papers)
    }

    fn limit(&self, max: Option<u64>) -> Value {
        limit(self.config.resolve_limit(max))
    }

    async fn run(
        &self,
        view: &'static str,
        sql: &str,
        values: Vec<Value>,
    ) -> Result<Vec<PaperView>> {
        let timer = QueryTimer::start(view);
        let papers: Vec<PaperView> = fetch_all(self.db.read(), sql, values).await?;

        debug!(view, rows = papers.len(), "Feed query");
        timer.finish(papers.len());

        Ok(papers)
    }
}
