//! Social graph: likes between users and papers

use paperclub_common::db::models::*;
use paperclub_common::errors::{AppError, Result};
use paperclub_common::{db, metrics, DbPool};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Statement, Value,
};
use tracing::{debug, info};

/// Like and unlike papers
#[derive(Clone)]
pub struct SocialService {
    db: DbPool,
}

impl SocialService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Record that `username` likes paper `pid`.
    ///
    /// A user can like a paper at most once and never their own. When two
    /// likes for the same pair race, the primary key lets exactly one through
    /// and the other fails with `AlreadyLiked`.
    pub async fn like(&self, username: &str, pid: i32) -> Result<()> {
        let result = self.try_like(username, pid).await;
        metrics::record_social("like", outcome_label(&result));
        result
    }

    async fn try_like(&self, username: &str, pid: i32) -> Result<()> {
        let conn = self.db.write();

        // One statement, so SQLite takes the write lock before it reads and a
        // racing like waits on the busy timeout instead of failing to upgrade.
        let sql = "INSERT INTO likes (pid, username, like_time) \
                   SELECT p.pid, u.username, $3 \
                   FROM papers p JOIN users u ON u.username = $2 \
                   WHERE p.pid = $1 AND p.username <> $2 \
                   ON CONFLICT (pid, username) DO NOTHING";

        let values = vec![pid.into(), username.into(), Value::from(db::now())];
        let stmt = Statement::from_sql_and_values(conn.get_database_backend(), sql, values);

        let inserted = conn
            .execute(stmt)
            .await
            .map_err(|e| {
                AppError::narrow(
                    e,
                    || Some(AppError::AlreadyLiked { username: username.to_owned(), pid }),
                    || Some(AppError::UserNotFound { username: username.to_owned() }),
                )
            })?
            .rows_affected();

        if inserted == 0 {
            return Err(self.like_refusal(username, pid).await?);
        }

        info!(username = %username, pid, "Paper liked");
        Ok(())
    }

    /// Why a like inserted nothing
    async fn like_refusal(&self, username: &str, pid: i32) -> Result<AppError> {
        let db = self.db.write();

        let Some(paper) = PaperEntity::find_by_id(pid).one(db).await? else {
            return Ok(AppError::PaperNotFound { pid });
        };

        if paper.username == username {
            return Ok(AppError::SelfLike { username: username.to_owned(), pid });
        }

        if UserEntity::find_by_id(username.to_owned()).one(db).await?.is_none() {
            return Ok(AppError::UserNotFound { username: username.to_owned() });
        }

        debug!(username = %username, pid, "Like already present");
        Ok(AppError::AlreadyLiked { username: username.to_owned(), pid })
    }

    /// Withdraw a like.
    ///
    /// Unliking one's own paper is `NotLiked`: such a like can never exist.
    pub async fn unlike(&self, username: &str, pid: i32) -> Result<()> {
        let result = self.try_unlike(username, pid).await;
        metrics::record_social("unlike", outcome_label(&result));
        result
    }

    async fn try_unlike(&self, username: &str, pid: i32) -> Result<()> {
        let db = self.db.write();

        let removed = LikeEntity::delete_by_id((pid, username.to_owned()))
            .exec(db)
            .await?;

        if removed.rows_affected == 0 {
            if PaperEntity::find_by_id(pid).one(db).await?.is_none() {
                return Err(AppError::PaperNotFound { pid });
            }
            return Err(AppError::NotLiked { username: username.to_owned(), pid });
        }

        info!(username = %username, pid, "Paper unliked");
        Ok(())
    }

    /// Number of likes on a paper; 0 for a paper nobody liked
    pub async fn count_likes(&self, pid: i32) -> Result<i64> {
        let count = LikeEntity::find()
            .filter(LikeColumn::Pid.eq(pid))
            .count(self.db.read())
            .await?;

        debug!(pid, count, "Counted likes");
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    pub async fn has_liked(&self, username: &str, pid: i32) -> Result<bool> {
        Ok(LikeEntity::find_by_id((pid, username.to_owned()))
            .one(self.db.read())
            .await?
            .is_some())
    }
}

fn outcome_label(result: &Result<()>) -> &'static str {
    match result {
        Ok(()) => "success",
        Err(AppError::PaperNotFound { .. }) | Err(AppError::UserNotFound { .. }) => "not_found",
        Err(AppError::SelfLike { .. }) => "self_like",
        Err(AppError::AlreadyLiked { .. }) => "already_liked",
        Err(AppError::NotLiked { .. }) => "not_liked",
        Err(_) => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(outcome_label(&Ok(())), "success");
        assert_eq!(outcome_label(&Err(AppError::PaperNotFound { pid: 1 })), "not_found");
        assert_eq!(
            outcome_label(&Err(AppError::SelfLike { username: "a".into(), pid: 1 })),
            "self_like"
        );
        assert_eq!(
            outcome_label(&Err(AppError::Internal { message: "x".into() })),
            "error"
        );
    }
}
