use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::{database::Database, error::AppError};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,
}

impl User {
    // Найти пользователя по email
    pub async fn find_by_email(email: &str, db: &Database) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, is_active, date_joined FROM users WHERE email = $1"
        )
        .bind(email.to_lowercase())
        .fetch_optional(&db.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_active(id: i64, db: &Database) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, is_active, date_joined
            FROM users
            WHERE id = $1 AND is_active = true
            "#
        )
        .bind(id)
        .fetch_optional(&db.pool)
        .await?;
        Ok(user)
    }

    /// Пароль приходит уже захешированным.
    pub async fn create(email: &str, password_hash: &str, db: &Database) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, is_active, date_joined
            "#
        )
        .bind(email.to_lowercase())
        .bind(password_hash)
        .fetch_one(&db.pool)
        .await?;
        Ok(user)
    }
}
