use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{database::Database, error::AppError};

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Performance {
    pub id: i64,
    pub play: i64,
    pub theatre_hall: i64,
    pub show_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PerformanceInput {
    pub play: i64,
    pub theatre_hall: i64,
    pub show_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PerformancePatch {
    pub play: Option<i64>,
    pub theatre_hall: Option<i64>,
    pub show_time: Option<DateTime<Utc>>,
}

impl PerformancePatch {
    pub fn apply(self, current: Performance) -> PerformanceInput {
        PerformanceInput {
            play: self.play.unwrap_or(current.play),
            theatre_hall: self.theatre_hall.unwrap_or(current.theatre_hall),
            show_time: self.show_time.unwrap_or(current.show_time),
        }
    }
}

const COLUMNS: &str = "id, play_id AS play, theatre_hall_id AS theatre_hall, show_time";

impl Performance {
    pub async fn list(db: &Database) -> Result<Vec<Performance>, AppError> {
        let performances = sqlx::query_as::<_, Performance>(&format!(
            "SELECT {COLUMNS} FROM performances ORDER BY id"
        ))
        .fetch_all(&db.pool)
        .await?;
        Ok(performances)
    }

    pub async fn find(id: i64, db: &Database) -> Result<Performance, AppError> {
        sqlx::query_as::<_, Performance>(&format!(
            "SELECT {COLUMNS} FROM performances WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&db.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Performance", id))
    }

    /// Несуществующая пьеса или зал дают NotFound.
    pub async fn create(input: PerformanceInput, db: &Database) -> Result<Performance, AppError> {
        let performance = sqlx::query_as::<_, Performance>(&format!(
            r#"
            INSERT INTO performances (play_id, theatre_hall_id, show_time)
            VALUES ($1, $2, $3)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(input.play)
        .bind(input.theatre_hall)
        .bind(input.show_time)
        .fetch_one(&db.pool)
        .await?;
        Ok(performance)
    }

    pub async fn update(id: i64, input: PerformanceInput, db: &Database) -> Result<Performance, AppError> {
        sqlx::query_as::<_, Performance>(&format!(
            r#"
            UPDATE performances SET play_id = $2, theatre_hall_id = $3, show_time = $4
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(input.play)
        .bind(input.theatre_hall)
        .bind(input.show_time)
        .fetch_optional(&db.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Performance", id))
    }

    pub async fn partial_update(id: i64, patch: PerformancePatch, db: &Database) -> Result<Performance, AppError> {
        let current = Self::find(id, db).await?;
        Self::update(id, patch.apply(current), db).await
    }

    pub async fn delete(id: i64, db: &Database) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM performances WHERE id = $1")
            .bind(id)
            .execute(&db.pool)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(AppError::not_found("Performance", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn show_time_parses_rfc3339() {
        let input: PerformanceInput = serde_json::from_value(serde_json::json!({
            "play": 1,
            "theatre_hall": 2,
            "show_time": "2023-09-15T19:00:00Z",
        }))
        .unwrap();
        assert_eq!(input.show_time, Utc.with_ymd_and_hms(2023, 9, 15, 19, 0, 0).unwrap());
    }

    #[test]
    fn missing_show_time_fails_to_parse() {
        let result = serde_json::from_value::<PerformanceInput>(serde_json::json!({
            "play": 1,
            "theatre_hall": 2,
        }));
        assert!(result.is_err());
    }

    #[test]
    fn references_serialize_under_relation_names() {
        let performance = Performance {
            id: 4,
            play: 1,
            theatre_hall: 2,
            show_time: Utc.with_ymd_and_hms(2023, 9, 20, 15, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(performance).unwrap();
        assert_eq!(json["play"], 1);
        assert_eq!(json["theatre_hall"], 2);
        assert_eq!(json["show_time"], "2023-09-20T15:00:00Z");
    }
}
