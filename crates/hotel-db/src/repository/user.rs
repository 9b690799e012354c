//! # User Repository
//!
//! Database operations for the staff directory.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};
use hotel_core::{Role, User};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    username: String,
    role: Role,
}

/// Repository for user database operations.
#[derive(Debug)]
pub struct UserRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> UserRepository<'c> {
    /// Creates a repository over a borrowed connection or transaction.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        UserRepository { conn }
    }

    /// Inserts a user; a taken username is a `UniqueViolation`.
    pub async fn insert(&mut self, user: &User) -> DbResult<()> {
        debug!(username = %user.username, role = %user.role, "Inserting user");

        sqlx::query("INSERT INTO users (username, role) VALUES (?1, ?2)")
            .bind(&user.username)
            .bind(user.role)
            .execute(&mut *self.conn)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { .. } => DbError::duplicate("username", &user.username),
                other => other,
            })?;

        Ok(())
    }

    /// Looks up a user by username.
    pub async fn find(&mut self, username: &str) -> DbResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT username, role FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(|r| User::new(r.username, r.role)))
    }

    /// Number of users.
    pub async fn count(&mut self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(count)
    }
}
