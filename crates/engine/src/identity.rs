//! Identity and ownership
//!
//! Registration, credential checks, and the "paper P is owned by user U" rule
//! the social graph relies on. Passwords are stored as Argon2 PHC strings.

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use paperclub_common::db::models::*;
use paperclub_common::errors::{AppError, Result};
use paperclub_common::{metrics, DbPool};
use sea_orm::{EntityTrait, Set};
use serde::Deserialize;
use tracing::{debug, info};
use validator::Validate;

/// Username and password as supplied at registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, max = 50))]
    pub username: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

/// Registration, login and ownership checks
#[derive(Clone)]
pub struct IdentityService {
    db: DbPool,
}

impl IdentityService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Register a new user.
    ///
    /// Fails with `UsernameTaken` when the username exists, including when a
    /// concurrent registration wins the race for the primary key.
    pub async fn register(&self, username: &str, password: &str) -> Result<()> {
        let credentials = Credentials::new(username, password);
        credentials.validate()?;

        let db = self.db.write();

        if UserEntity::find_by_id(username.to_owned()).one(db).await?.is_some() {
            return Err(AppError::UsernameTaken { username: username.to_owned() });
        }

        let hash = run_blocking(move || hash_password(&credentials.password)).await?;

        let user = UserActiveModel {
            username: Set(username.to_owned()),
            password: Set(hash),
        };

        UserEntity::insert(user)
            .exec_without_returning(db)
            .await
            .map_err(|e| {
                AppError::narrow(
                    e,
                    || Some(AppError::UsernameTaken { username: username.to_owned() }),
                    || None,
                )
            })?;

        metrics::record_registration();
        info!(username = %username, "User registered");
        Ok(())
    }

    /// Check a username/password pair
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<()> {
        let user = UserEntity::find_by_id(username.to_owned())
            .one(self.db.write())
            .await?
            .ok_or_else(|| AppError::UserNotFound { username: username.to_owned() })?;

        let password = password.to_owned();
        let matches = run_blocking(move || verify_password(&password, &user.password)).await?;

        if !matches {
            debug!(username = %username, "Password mismatch");
            return Err(AppError::WrongPassword { username: username.to_owned() });
        }

        Ok(())
    }

    /// Whether a user with this name exists
    pub async fn user_exists(&self, username: &str) -> Result<bool> {
        Ok(UserEntity::find_by_id(username.to_owned())
            .one(self.db.read())
            .await?
            .is_some())
    }

    /// Owning username of a paper
    pub async fn owner_of(&self, pid: i32) -> Result<String> {
        PaperEntity::find_by_id(pid)
            .one(self.db.read())
            .await?
            .map(|paper| paper.username)
            .ok_or(AppError::PaperNotFound { pid })
    }

    /// Paper `pid` is owned by `username` iff its owning username equals `username`
    pub async fn is_owner(&self, pid: i32, username: &str) -> Result<bool> {
        Ok(self.owner_of(pid).await? == username)
    }

    /// Delete a user together with their papers, those papers' tags and likes,
    /// and every like the user gave. Runs as one statement; the store's
    /// cascading foreign keys remove the dependents.
    pub async fn delete_user(&self, username: &str) -> Result<()> {
        let result = UserEntity::delete_by_id(username.to_owned())
            .exec(self.db.write())
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::UserNotFound { username: username.to_owned() });
        }

        info!(username = %username, "User deleted");
        Ok(())
    }
}

/// Argon2 is deliberately slow, so keep it off the async workers
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal {
            message: format!("Password task failed: {}", e),
        })?
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal {
            message: format!("Failed to hash password: {}", e),
        })
}

fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| AppError::Internal {
        message: format!("Stored credential is not a valid hash: {}", e),
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_is_internal_error() {
        let err = verify_password("pw", "not-a-hash").unwrap_err();
        assert!(err.is_store_error());
    }

    #[test]
    fn test_credentials_validation() {
        assert!(Credentials::new("alice", "pw").validate().is_ok());
        assert!(Credentials::new("", "pw").validate().is_err());
        assert!(Credentials::new("alice", "").validate().is_err());
        assert!(Credentials::new(&"x".repeat(51), "pw").validate().is_err());
    }
}
