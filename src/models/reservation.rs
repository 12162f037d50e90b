use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{database::Database, error::AppError};

/// Бронь всегда принадлежит одному пользователю; все запросы ниже
/// ограничены владельцем, чужая бронь выглядит как несуществующая.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub user: i64,
}

/// Тело POST и PATCH. Поле `user` из тела игнорируется.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationInput {
    pub created_at: Option<DateTime<Utc>>,
}

/// Тело PUT: полная замена требует `created_at`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationUpdate {
    pub created_at: DateTime<Utc>,
}

const COLUMNS: &str = "id, created_at, user_id AS user";

impl Reservation {
    pub async fn list_for_user(user_id: i64, db: &Database) -> Result<Vec<Reservation>, AppError> {
        let reservations = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {COLUMNS} FROM reservations WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&db.pool)
        .await?;
        Ok(reservations)
    }

    pub async fn find_for_user(id: i64, user_id: i64, db: &Database) -> Result<Reservation, AppError> {
        sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {COLUMNS} FROM reservations WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&db.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Reservation", id))
    }

    /// Без `created_at` берётся время сервера.
    pub async fn create(user_id: i64, input: ReservationInput, db: &Database) -> Result<Reservation, AppError> {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            INSERT INTO reservations (created_at, user_id)
            VALUES (COALESCE($1, NOW()), $2)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(input.created_at)
        .bind(user_id)
        .fetch_one(&db.pool)
        .await?;
        Ok(reservation)
    }

    pub async fn update(
        id: i64,
        user_id: i64,
        input: ReservationUpdate,
        db: &Database,
    ) -> Result<Reservation, AppError> {
        Self::set_created_at(id, user_id, Some(input.created_at), db).await
    }

    pub async fn partial_update(
        id: i64,
        user_id: i64,
        input: ReservationInput,
        db: &Database,
    ) -> Result<Reservation, AppError> {
        Self::set_created_at(id, user_id, input.created_at, db).await
    }

    async fn set_created_at(
        id: i64,
        user_id: i64,
        created_at: Option<DateTime<Utc>>,
        db: &Database,
    ) -> Result<Reservation, AppError> {
        sqlx::query_as::<_, Reservation>(&format!(
            r#"
            UPDATE reservations SET created_at = COALESCE($3, created_at)
            WHERE id = $1 AND user_id = $2
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(created_at)
        .fetch_optional(&db.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Reservation", id))
    }

    /// Билеты брони удаляются каскадом.
    pub async fn delete_for_user(id: i64, user_id: i64, db: &Database) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM reservations WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&db.pool)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(AppError::not_found("Reservation", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_in_body_is_ignored() {
        let input: ReservationInput = serde_json::from_value(serde_json::json!({
            "created_at": "2023-09-10T12:00:00Z",
            "user": 999,
        }))
        .unwrap();
        assert!(input.created_at.is_some());
    }

    #[test]
    fn created_at_is_optional_on_create() {
        let input: ReservationInput = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(input.created_at.is_none());
    }

    #[test]
    fn full_update_requires_created_at() {
        assert!(serde_json::from_value::<ReservationUpdate>(serde_json::json!({})).is_err());
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        let result = serde_json::from_value::<ReservationInput>(serde_json::json!({
            "created_at": "yesterday",
        }));
        assert!(result.is_err());
    }
}
