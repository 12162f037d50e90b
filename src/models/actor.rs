use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::{database::Database, error::AppError};

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name, last_name)
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ActorInput {
    #[validate(length(min = 1, max = 255, message = "First name must be between 1 and 255 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 255, message = "Last name must be between 1 and 255 characters"))]
    pub last_name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ActorPatch {
    #[validate(length(min = 1, max = 255, message = "First name must be between 1 and 255 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Last name must be between 1 and 255 characters"))]
    pub last_name: Option<String>,
}

impl ActorPatch {
    pub fn apply(self, current: Actor) -> ActorInput {
        ActorInput {
            first_name: self.first_name.unwrap_or(current.first_name),
            last_name: self.last_name.unwrap_or(current.last_name),
        }
    }
}

impl Actor {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }

    pub async fn list(db: &Database) -> Result<Vec<Actor>, AppError> {
        let actors = sqlx::query_as::<_, Actor>(
            "SELECT id, first_name, last_name FROM actors ORDER BY id"
        )
        .fetch_all(&db.pool)
        .await?;
        Ok(actors)
    }

    pub async fn find(id: i64, db: &Database) -> Result<Actor, AppError> {
        sqlx::query_as::<_, Actor>("SELECT id, first_name, last_name FROM actors WHERE id = $1")
            .bind(id)
            .fetch_optional(&db.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Actor", id))
    }

    pub async fn create(input: ActorInput, db: &Database) -> Result<Actor, AppError> {
        input.validate()?;
        let actor = sqlx::query_as::<_, Actor>(
            r#"
            INSERT INTO actors (first_name, last_name)
            VALUES ($1, $2)
            RETURNING id, first_name, last_name
            "#
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .fetch_one(&db.pool)
        .await?;
        Ok(actor)
    }

    pub async fn update(id: i64, input: ActorInput, db: &Database) -> Result<Actor, AppError> {
        input.validate()?;
        sqlx::query_as::<_, Actor>(
            r#"
            UPDATE actors SET first_name = $2, last_name = $3
            WHERE id = $1
            RETURNING id, first_name, last_name
            "#
        )
        .bind(id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .fetch_optional(&db.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Actor", id))
    }

    pub async fn partial_update(id: i64, patch: ActorPatch, db: &Database) -> Result<Actor, AppError> {
        patch.validate()?;
        let current = Self::find(id, db).await?;
        Self::update(id, patch.apply(current), db).await
    }

    pub async fn delete(id: i64, db: &Database) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM actors WHERE id = $1")
            .bind(id)
            .execute(&db.pool)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(AppError::not_found("Actor", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_joins_first_and_last() {
        let actor = Actor {
            id: 1,
            first_name: "John".into(),
            last_name: "Smith".into(),
        };
        assert_eq!(actor.full_name(), "John Smith");
    }

    #[test]
    fn full_name_is_not_serialized() {
        let json = serde_json::to_value(Actor {
            id: 3,
            first_name: "Jane".into(),
            last_name: "Doe".into(),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": 3, "first_name": "Jane", "last_name": "Doe" })
        );
    }

    #[test]
    fn patch_replaces_only_given_fields() {
        let current = Actor {
            id: 1,
            first_name: "John".into(),
            last_name: "Doe".into(),
        };
        let patch = ActorPatch {
            last_name: Some("Smith".into()),
            ..Default::default()
        };
        let merged = patch.apply(current);
        assert_eq!(full_name(&merged.first_name, &merged.last_name), "John Smith");
    }

    #[test]
    fn empty_last_name_is_rejected() {
        let input = ActorInput {
            first_name: "John".into(),
            last_name: String::new(),
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("last_name"));
    }
}
