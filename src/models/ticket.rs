use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::{database::Database, error::AppError};

// TODO: уникальность (performance, row, seat) и проверка границ зала не
// проверяются, одно место можно продать дважды
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub row: i32,
    pub seat: i32,
    pub performance: i64,
    pub reservation: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TicketInput {
    #[validate(range(min = 1, message = "Row must be a positive integer"))]
    pub row: i32,
    #[validate(range(min = 1, message = "Seat must be a positive integer"))]
    pub seat: i32,
    pub performance: i64,
    pub reservation: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TicketPatch {
    #[validate(range(min = 1, message = "Row must be a positive integer"))]
    pub row: Option<i32>,
    #[validate(range(min = 1, message = "Seat must be a positive integer"))]
    pub seat: Option<i32>,
    pub performance: Option<i64>,
    pub reservation: Option<i64>,
}

impl TicketPatch {
    pub fn apply(self, current: Ticket) -> TicketInput {
        TicketInput {
            row: self.row.unwrap_or(current.row),
            seat: self.seat.unwrap_or(current.seat),
            performance: self.performance.unwrap_or(current.performance),
            reservation: self.reservation.unwrap_or(current.reservation),
        }
    }
}

const COLUMNS: &str = r#"id, "row", seat, performance_id AS performance, reservation_id AS reservation"#;

impl Ticket {
    pub async fn list(db: &Database) -> Result<Vec<Ticket>, AppError> {
        let tickets = sqlx::query_as::<_, Ticket>(&format!(
            "SELECT {COLUMNS} FROM tickets ORDER BY id"
        ))
        .fetch_all(&db.pool)
        .await?;
        Ok(tickets)
    }

    pub async fn find(id: i64, db: &Database) -> Result<Ticket, AppError> {
        sqlx::query_as::<_, Ticket>(&format!("SELECT {COLUMNS} FROM tickets WHERE id = $1"))
            .bind(id)
            .fetch_optional(&db.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Ticket", id))
    }

    /// Создаёт билет в брони пользователя. Чужая или несуществующая бронь
    /// отвечает одинаково, NotFound.
    pub async fn create(input: TicketInput, user_id: i64, db: &Database) -> Result<Ticket, AppError> {
        input.validate()?;
        sqlx::query_as::<_, Ticket>(&format!(
            r#"
            INSERT INTO tickets ("row", seat, performance_id, reservation_id)
            SELECT $1, $2, $3, $4
            WHERE EXISTS (SELECT 1 FROM reservations WHERE id = $4 AND user_id = $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(input.row)
        .bind(input.seat)
        .bind(input.performance)
        .bind(input.reservation)
        .bind(user_id)
        .fetch_optional(&db.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Reservation", input.reservation))
    }

    // Билет меняет только владелец текущей брони, и перенести его можно
    // только в свою бронь
    pub async fn update(
        id: i64,
        input: TicketInput,
        user_id: i64,
        db: &Database,
    ) -> Result<Ticket, AppError> {
        input.validate()?;
        if !reservation_owned_by(input.reservation, user_id, db).await? {
            return Err(AppError::not_found("Reservation", input.reservation));
        }

        sqlx::query_as::<_, Ticket>(&format!(
            r#"
            UPDATE tickets
            SET "row" = $2, seat = $3, performance_id = $4, reservation_id = $5
            WHERE id = $1
              AND reservation_id IN (SELECT id FROM reservations WHERE user_id = $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(input.row)
        .bind(input.seat)
        .bind(input.performance)
        .bind(input.reservation)
        .bind(user_id)
        .fetch_optional(&db.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Ticket", id))
    }

    pub async fn partial_update(
        id: i64,
        patch: TicketPatch,
        user_id: i64,
        db: &Database,
    ) -> Result<Ticket, AppError> {
        patch.validate()?;
        let current = Self::find_for_user(id, user_id, db).await?;
        Self::update(id, patch.apply(current), user_id, db).await
    }

    pub async fn delete(id: i64, user_id: i64, db: &Database) -> Result<(), AppError> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM tickets
            WHERE id = $1
              AND reservation_id IN (SELECT id FROM reservations WHERE user_id = $2)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&db.pool)
        .await?
        .rows_affected();
        if deleted == 0 {
            return Err(AppError::not_found("Ticket", id));
        }
        Ok(())
    }

    async fn find_for_user(id: i64, user_id: i64, db: &Database) -> Result<Ticket, AppError> {
        sqlx::query_as::<_, Ticket>(&format!(
            r#"
            SELECT {COLUMNS} FROM tickets
            WHERE id = $1
              AND reservation_id IN (SELECT id FROM reservations WHERE user_id = $2)
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&db.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Ticket", id))
    }
}

async fn reservation_owned_by(reservation: i64, user_id: i64, db: &Database) -> Result<bool, AppError> {
    let owned = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM reservations WHERE id = $1 AND user_id = $2)",
    )
    .bind(reservation)
    .bind(user_id)
    .fetch_one(&db.pool)
    .await?;
    Ok(owned)
}
