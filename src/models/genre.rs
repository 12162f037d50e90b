use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::{database::Database, error::AppError};

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenreInput {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct GenrePatch {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,
}

impl GenrePatch {
    pub fn apply(self, current: Genre) -> GenreInput {
        GenreInput {
            name: self.name.unwrap_or(current.name),
        }
    }
}

impl Genre {
    pub async fn list(db: &Database) -> Result<Vec<Genre>, AppError> {
        let genres = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY id")
            .fetch_all(&db.pool)
            .await?;
        Ok(genres)
    }

    pub async fn find(id: i64, db: &Database) -> Result<Genre, AppError> {
        sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&db.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Genre", id))
    }

    pub async fn create(input: GenreInput, db: &Database) -> Result<Genre, AppError> {
        input.validate()?;
        let genre = sqlx::query_as::<_, Genre>(
            "INSERT INTO genres (name) VALUES ($1) RETURNING id, name"
        )
        .bind(&input.name)
        .fetch_one(&db.pool)
        .await?;
        Ok(genre)
    }

    pub async fn update(id: i64, input: GenreInput, db: &Database) -> Result<Genre, AppError> {
        input.validate()?;
        sqlx::query_as::<_, Genre>(
            "UPDATE genres SET name = $2 WHERE id = $1 RETURNING id, name"
        )
        .bind(id)
        .bind(&input.name)
        .fetch_optional(&db.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Genre", id))
    }

    pub async fn partial_update(id: i64, patch: GenrePatch, db: &Database) -> Result<Genre, AppError> {
        patch.validate()?;
        let current = Self::find(id, db).await?;
        Self::update(id, patch.apply(current), db).await
    }

    pub async fn delete(id: i64, db: &Database) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(&db.pool)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(AppError::not_found("Genre", id));
        }
        Ok(())
    }
}
