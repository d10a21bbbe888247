//! Users repository

use sqlx::{Pool, Postgres};

use super::{referential, Page};
use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, User},
};

const USER_COLUMNS: &str = "id, username, password, first_name, last_name, email, \
                            is_active, is_staff, is_superuser, permissions, created_at";

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List users ordered by username
    pub async fn list(&self, page: Page) -> AppResult<(Vec<User>, i64)> {
        let total = self.count().await?;

        let sql = format!(
            "SELECT {} FROM users ORDER BY username LIMIT $1 OFFSET $2",
            USER_COLUMNS
        );
        let rows = sqlx::query_as::<_, User>(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Create a user; `password_hash` is already hashed
    pub async fn create(&self, data: &CreateUser, password_hash: Option<String>) -> AppResult<User> {
        let permissions: Vec<String> = data
            .permissions
            .iter()
            .map(|p| p.codename().to_string())
            .collect();

        let sql = format!(
            r#"
            INSERT INTO users (username, password, first_name, last_name, email,
                               is_staff, is_superuser, permissions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&data.username)
            .bind(password_hash)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.email)
            .bind(data.is_staff)
            .bind(data.is_superuser)
            .bind(permissions)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    /// Delete a user; copies they borrowed lose their borrower
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        referential::delete_with_rules(&mut tx, "users", id).await?;
        tx.commit().await?;
        Ok(())
    }
}
