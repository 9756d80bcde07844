//! Row types produced by the ranking and statistics queries

use super::models::Paper;
use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

/// The public face of a paper in every feed: `(pid, owner, title, created_at, description)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct PaperView {
    pub pid: i32,
    pub username: String,
    pub title: String,
    pub begin_time: DateTime<Utc>,
    pub description: String,
}

/// A user ranked by number of papers posted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct UserActivity {
    pub username: String,
    pub paper_count: i64,
}

/// A tag ranked by number of papers carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct TagCount {
    pub tag: String,
    pub paper_count: i64,
}

/// Two distinct tags seen together, `first_tag < second_tag`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct TagPair {
    pub first_tag: String,
    pub second_tag: String,
    pub paper_count: i64,
}

/// A member of a user's recommendation cohort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct CohortMember {
    pub username: String,
    pub shared_likes: i64,
}

/// Per-user counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub papers_posted: u64,
    pub likes_given: u64,
    pub distinct_tags_used: u64,
}

impl From<Paper> for PaperView {
    fn from(paper: Paper) -> Self {
        Self {
            pid: paper.pid,
            username: paper.username,
            title: paper.title,
            begin_time: paper.begin_time,
            description: paper.description,
        }
    }
}
