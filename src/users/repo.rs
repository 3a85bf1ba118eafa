use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::repo_types::{NewUser, User, UserSummary};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        let unique = e
            .as_database_error()
            .map(|d| d.is_unique_violation())
            .unwrap_or(false);
        if unique {
            RepoError::DuplicateEmail
        } else {
            RepoError::Other(e.into())
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Stores a new active user. Fails with [`RepoError::DuplicateEmail`] if the
    /// email is taken.
    async fn insert(&self, user: NewUser) -> Result<User, RepoError>;

    async fn set_token(&self, id: Uuid, token: &str) -> Result<(), RepoError>;

    /// Flips active/inactive on every user in a single store-level update.
    /// Returns the number of affected users.
    async fn toggle_all_statuses(&self) -> Result<u64, RepoError>;

    /// Users with `start <= register_at < end`.
    async fn list_registered_between(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<UserSummary>, RepoError>;
}

pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, address, latitude, longitude,
                   status, token, register_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, address, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, email, password_hash, address, latitude, longitude,
                      status, token, register_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.address)
        .bind(user.latitude)
        .bind(user.longitude)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn set_token(&self, id: Uuid, token: &str) -> Result<(), RepoError> {
        sqlx::query(r#"UPDATE users SET token = $2 WHERE id = $1"#)
            .bind(id)
            .bind(token)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn toggle_all_statuses(&self) -> Result<u64, RepoError> {
        let res = sqlx::query(
            r#"
            UPDATE users
               SET status = CASE status
                              WHEN 'active' THEN 'inactive'::user_status
                              ELSE 'active'::user_status
                            END
            "#,
        )
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected())
    }

    async fn list_registered_between(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<UserSummary>, RepoError> {
        let rows = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT name, email
              FROM users
             WHERE register_at >= $1 AND register_at < $2
             ORDER BY register_at ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
