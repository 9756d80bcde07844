//! Paper catalog
//!
//! Posting, removing and reading single papers. A paper and its tag
//! associations are written in one transaction, so a paper is never visible
//! without its tags.

use crate::tags::{sanitize_tags, MAX_TAG_LEN};
use paperclub_common::db::models::*;
use paperclub_common::errors::{AppError, Result};
use paperclub_common::{db, metrics, DbPool, PaperView};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

/// Request to post a paper
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewPaper {
    #[validate(length(min = 1, max = 50))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,

    /// Full text
    #[serde(default)]
    pub content: String,

    /// Raw tags, sanitised before storage
    #[serde(default)]
    #[validate(length(max = 32))]
    pub tags: Vec<String>,
}

impl NewPaper {
    pub fn new(title: &str, description: &str, content: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            content: content.to_string(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.tags = tags.iter().map(|t| t.as_ref().to_string()).collect();
        self
    }
}

/// Paper catalog service
#[derive(Clone)]
pub struct PaperService {
    db: DbPool,
}

impl PaperService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Post a paper owned by `username` and return its id.
    ///
    /// Missing tag names are created on the way. Any failure rolls back the
    /// paper, its tag names and its associations together.
    pub async fn add_paper(&self, username: &str, paper: NewPaper) -> Result<i32> {
        paper.validate()?;

        let tags = sanitize_tags(&paper.tags);
        if let Some(tag) = tags.iter().find(|t| t.len() > MAX_TAG_LEN) {
            return Err(AppError::validation(
                "tags",
                format!("Tag {:?} is longer than {} characters", tag, MAX_TAG_LEN),
            ));
        }

        // The paper insert is the transaction's first statement, so the write
        // lock is taken up front. An unknown owner surfaces as a foreign key
        // violation.
        let txn = self.db.write().begin().await?;

        let model = PaperActiveModel {
            pid: NotSet,
            username: Set(username.to_owned()),
            title: Set(paper.title),
            description: Set(paper.description),
            begin_time: Set(db::now()),
            content: Set(paper.content),
        };

        let pid = PaperEntity::insert(model)
            .exec(&txn)
            .await
            .map_err(|e| {
                AppError::narrow(
                    e,
                    || None,
                    || Some(AppError::UserNotFound { username: username.to_owned() }),
                )
            })?
            .last_insert_id;

        if !tags.is_empty() {
            let names = tags.iter().map(|tag| TagNameActiveModel {
                tagname: Set(tag.clone()),
            });

            TagNameEntity::insert_many(names)
                .on_conflict(
                    OnConflict::column(TagNameColumn::Tagname)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await?;

            let links = tags.iter().map(|tag| TagActiveModel {
                pid: Set(pid),
                tagname: Set(tag.clone()),
            });

            TagEntity::insert_many(links)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;

        metrics::record_paper_created(tags.len());
        info!(pid, username = %username, tags = tags.len(), "Paper posted");

        Ok(pid)
    }

    /// Remove a paper with its tag associations and likes
    pub async fn delete_paper(&self, pid: i32) -> Result<()> {
        let result = PaperEntity::delete_by_id(pid).exec(self.db.write()).await?;

        if result.rows_affected == 0 {
            return Err(AppError::PaperNotFound { pid });
        }

        info!(pid, "Paper deleted");
        Ok(())
    }

    pub async fn get_paper(&self, pid: i32) -> Result<PaperView> {
        PaperEntity::find_by_id(pid)
            .one(self.db.read())
            .await?
            .map(PaperView::from)
            .ok_or(AppError::PaperNotFound { pid })
    }

    /// Tag names of a paper, ascending in byte order
    pub async fn get_paper_tags(&self, pid: i32) -> Result<Vec<String>> {
        let tags = TagEntity::find()
            .filter(TagColumn::Pid.eq(pid))
            .order_by_asc(TagColumn::Tagname)
            .all(self.db.read())
            .await?;

        debug!(pid, count = tags.len(), "Fetched paper tags");
        Ok(tags.into_iter().map(|tag| tag.tagname).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_paper_validation() {
        assert!(NewPaper::new("Title", "", "").validate().is_ok());
        assert!(NewPaper::new("", "desc", "").validate().is_err());
        assert!(NewPaper::new(&"t".repeat(51), "", "").validate().is_err());
        assert!(NewPaper::new("Title", &"d".repeat(501), "").validate().is_err());
    }

    #[test]
    fn test_too_many_tags() {
        let tags: Vec<String> = (0..33).map(|i| format!("tag{}", i)).collect();
        let paper = NewPaper::new("Title", "", "").with_tags(&tags);
        assert!(paper.validate().is_err());
    }

    #[test]
    fn test_with_tags() {
        let paper = NewPaper::new("Title", "", "").with_tags(&["db", "sql"]);
        assert_eq!(paper.tags, vec!["db".to_string(), "sql".to_string()]);
    }
}
