use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::{database::Database, error::AppError};

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct TheatreHall {
    pub id: i64,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TheatreHallInput {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(range(min = 1, message = "Rows must be a positive integer"))]
    pub rows: i32,
    #[validate(range(min = 1, message = "Seats in row must be a positive integer"))]
    pub seats_in_row: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TheatreHallPatch {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 1, message = "Rows must be a positive integer"))]
    pub rows: Option<i32>,
    #[validate(range(min = 1, message = "Seats in row must be a positive integer"))]
    pub seats_in_row: Option<i32>,
}

impl TheatreHallPatch {
    pub fn apply(self, current: TheatreHall) -> TheatreHallInput {
        TheatreHallInput {
            name: self.name.unwrap_or(current.name),
            rows: self.rows.unwrap_or(current.rows),
            seats_in_row: self.seats_in_row.unwrap_or(current.seats_in_row),
        }
    }
}

impl TheatreHall {
    pub async fn list(db: &Database) -> Result<Vec<TheatreHall>, AppError> {
        let halls = sqlx::query_as::<_, TheatreHall>(
            "SELECT id, name, rows, seats_in_row FROM theatre_halls ORDER BY id"
        )
        .fetch_all(&db.pool)
        .await?;
        Ok(halls)
    }

    pub async fn find(id: i64, db: &Database) -> Result<TheatreHall, AppError> {
        sqlx::query_as::<_, TheatreHall>(
            "SELECT id, name, rows, seats_in_row FROM theatre_halls WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&db.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Theatre hall", id))
    }

    pub async fn create(input: TheatreHallInput, db: &Database) -> Result<TheatreHall, AppError> {
        input.validate()?;
        let hall = sqlx::query_as::<_, TheatreHall>(
            r#"
            INSERT INTO theatre_halls (name, rows, seats_in_row)
            VALUES ($1, $2, $3)
            RETURNING id, name, rows, seats_in_row
            "#
        )
        .bind(&input.name)
        .bind(input.rows)
        .bind(input.seats_in_row)
        .fetch_one(&db.pool)
        .await?;
        Ok(hall)
    }

    pub async fn update(id: i64, input: TheatreHallInput, db: &Database) -> Result<TheatreHall, AppError> {
        input.validate()?;
        sqlx::query_as::<_, TheatreHall>(
            r#"
            UPDATE theatre_halls SET name = $2, rows = $3, seats_in_row = $4
            WHERE id = $1
            RETURNING id, name, rows, seats_in_row
            "#
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.rows)
        .bind(input.seats_in_row)
        .fetch_optional(&db.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Theatre hall", id))
    }

    pub async fn partial_update(id: i64, patch: TheatreHallPatch, db: &Database) -> Result<TheatreHall, AppError> {
        patch.validate()?;
        let current = Self::find(id, db).await?;
        Self::update(id, patch.apply(current), db).await
    }

    /// Спектакли в зале (и их билеты) удаляются каскадом.
    pub async fn delete(id: i64, db: &Database) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM theatre_halls WHERE id = $1")
            .bind(id)
            .execute(&db.pool)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(AppError::not_found("Theatre hall", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(rows: i32, seats_in_row: i32) -> TheatreHallInput {
        TheatreHallInput {
            name: "Main Hall".into(),
            rows,
            seats_in_row,
        }
    }

    #[test]
    fn positive_dimensions_are_accepted() {
        assert!(input(10, 20).validate().is_ok());
    }

    #[test]
    fn zero_or_negative_dimensions_are_rejected() {
        let errors = input(0, -5).validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("rows"));
        assert!(fields.contains_key("seats_in_row"));
    }

    #[test]
    fn patch_validates_only_present_fields() {
        let patch = TheatreHallPatch {
            rows: Some(0),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
        assert!(TheatreHallPatch::default().validate().is_ok());
    }
}
