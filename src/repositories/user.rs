use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::{Row, error::SqlState};
use uuid::Uuid;

use super::traits::UserRepository;
use crate::{
    error::{AppError, Result},
    models::user::User,
};

/// A helper function to map a `tokio_postgres::Row` to a `User`.
fn row_to_user(row: &Row) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Users table access.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool,
}

impl PgUserRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> Result<()> {
        let client = self.pool.get().await?;
        let stmt = client
            .prepare_cached(
                r#"
                INSERT INTO users (id, email, name, password_hash, created_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .await?;

        client
            .execute(
                &stmt,
                &[&user.id, &user.email, &user.name, &user.password_hash, &user.created_at],
            )
            .await
            .map_err(|e| {
                if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
                    AppError::EmailExists
                } else {
                    AppError::Database(e)
                }
            })?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let client = self.pool.get().await?;
        let stmt = client
            .prepare_cached(
                r#"
                SELECT id, email, name, password_hash, created_at
                FROM users
                WHERE email = $1
                "#,
            )
            .await?;
        let row = client.query_opt(&stmt, &[&email]).await?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let client = self.pool.get().await?;
        let stmt = client
            .prepare_cached(
                r#"
                SELECT id, email, name, password_hash, created_at
                FROM users
                WHERE id = $1
                "#,
            )
            .await?;
        let row = client.query_opt(&stmt, &[&id]).await?;
        row.map(|r| row_to_user(&r)).transpose()
    }
}
