use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Postgres, Transaction};
use std::collections::BTreeMap;
use validator::Validate;

use crate::{database::Database, error::AppError, models::actor::full_name};

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Play {
    pub id: i64,
    pub title: String,
    pub description: String,
}

/// Представление одной пьесы: связи отдаются идентификаторами.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayDetail {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub genres: Vec<i64>,
    pub actors: Vec<i64>,
}

/// Элемент списка пьес: вместо идентификаторов жанров и актёров их имена.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayListItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PlayInput {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub genres: Vec<i64>,
    #[serde(default)]
    pub actors: Vec<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PlayPatch {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub genres: Option<Vec<i64>>,
    pub actors: Option<Vec<i64>>,
}

impl PlayPatch {
    pub fn apply(self, current: PlayDetail) -> PlayInput {
        PlayInput {
            title: self.title.unwrap_or(current.title),
            description: self.description.unwrap_or(current.description),
            genres: self.genres.unwrap_or(current.genres),
            actors: self.actors.unwrap_or(current.actors),
        }
    }
}

/// Собирает списочное представление из строк пьес и их связей.
/// Связи ожидаются как (play_id, имя), порядок внутри пьесы сохраняется.
pub fn denormalize(
    plays: Vec<Play>,
    genre_links: Vec<(i64, String)>,
    actor_links: Vec<(i64, String, String)>,
) -> Vec<PlayListItem> {
    let mut genres: BTreeMap<i64, Vec<String>> = BTreeMap::new();
    for (play_id, name) in genre_links {
        genres.entry(play_id).or_default().push(name);
    }

    let mut actors: BTreeMap<i64, Vec<String>> = BTreeMap::new();
    for (play_id, first_name, last_name) in actor_links {
        actors
            .entry(play_id)
            .or_default()
            .push(full_name(&first_name, &last_name));
    }

    plays
        .into_iter()
        .map(|p| PlayListItem {
            genres: genres.remove(&p.id).unwrap_or_default(),
            actors: actors.remove(&p.id).unwrap_or_default(),
            id: p.id,
            title: p.title,
            description: p.description,
        })
        .collect()
}

fn normalize_ids(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

impl Play {
    pub async fn list(db: &Database) -> Result<Vec<PlayListItem>, AppError> {
        let plays = sqlx::query_as::<_, Play>(
            "SELECT id, title, description FROM plays ORDER BY id"
        )
        .fetch_all(&db.pool)
        .await?;

        let genre_links = sqlx::query_as::<_, (i64, String)>(
            r#"
            SELECT pg.play_id, g.name
            FROM play_genres pg
            JOIN genres g ON g.id = pg.genre_id
            ORDER BY pg.play_id, g.id
            "#
        )
        .fetch_all(&db.pool)
        .await?;

        let actor_links = sqlx::query_as::<_, (i64, String, String)>(
            r#"
            SELECT pa.play_id, a.first_name, a.last_name
            FROM play_actors pa
            JOIN actors a ON a.id = pa.actor_id
            ORDER BY pa.play_id, a.id
            "#
        )
        .fetch_all(&db.pool)
        .await?;

        Ok(denormalize(plays, genre_links, actor_links))
    }

    pub async fn find(id: i64, db: &Database) -> Result<PlayDetail, AppError> {
        let play = sqlx::query_as::<_, Play>(
            "SELECT id, title, description FROM plays WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&db.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Play", id))?;

        let genres = sqlx::query_scalar::<_, i64>(
            "SELECT genre_id FROM play_genres WHERE play_id = $1 ORDER BY genre_id"
        )
        .bind(id)
        .fetch_all(&db.pool)
        .await?;

        let actors = sqlx::query_scalar::<_, i64>(
            "SELECT actor_id FROM play_actors WHERE play_id = $1 ORDER BY actor_id"
        )
        .bind(id)
        .fetch_all(&db.pool)
        .await?;

        Ok(PlayDetail {
            id: play.id,
            title: play.title,
            description: play.description,
            genres,
            actors,
        })
    }

    pub async fn create(input: PlayInput, db: &Database) -> Result<PlayDetail, AppError> {
        input.validate()?;
        let mut tx = db.pool.begin().await?;

        let play = sqlx::query_as::<_, Play>(
            r#"
            INSERT INTO plays (title, description)
            VALUES ($1, $2)
            RETURNING id, title, description
            "#
        )
        .bind(&input.title)
        .bind(&input.description)
        .fetch_one(&mut *tx)
        .await?;

        let (genres, actors) =
            replace_relations(&mut tx, play.id, input.genres, input.actors).await?;
        tx.commit().await?;

        Ok(PlayDetail {
            id: play.id,
            title: play.title,
            description: play.description,
            genres,
            actors,
        })
    }

    pub async fn update(id: i64, input: PlayInput, db: &Database) -> Result<PlayDetail, AppError> {
        input.validate()?;
        let mut tx = db.pool.begin().await?;

        let play = sqlx::query_as::<_, Play>(
            r#"
            UPDATE plays SET title = $2, description = $3
            WHERE id = $1
            RETURNING id, title, description
            "#
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("Play", id))?;

        let (genres, actors) =
            replace_relations(&mut tx, play.id, input.genres, input.actors).await?;
        tx.commit().await?;

        Ok(PlayDetail {
            id: play.id,
            title: play.title,
            description: play.description,
            genres,
            actors,
        })
    }

    pub async fn partial_update(id: i64, patch: PlayPatch, db: &Database) -> Result<PlayDetail, AppError> {
        patch.validate()?;
        let current = Self::find(id, db).await?;
        Self::update(id, patch.apply(current), db).await
    }

    /// Удаляет пьесу; спектакли и их билеты уходят каскадом.
    pub async fn delete(id: i64, db: &Database) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM plays WHERE id = $1")
            .bind(id)
            .execute(&db.pool)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(AppError::not_found("Play", id));
        }
        Ok(())
    }
}

// Несуществующий жанр/актёр даёт 23503, что превращается в NotFound
async fn replace_relations(
    tx: &mut Transaction<'_, Postgres>,
    play_id: i64,
    genres: Vec<i64>,
    actors: Vec<i64>,
) -> Result<(Vec<i64>, Vec<i64>), AppError> {
    let genres = normalize_ids(genres);
    let actors = normalize_ids(actors);

    sqlx::query("DELETE FROM play_genres WHERE play_id = $1")
        .bind(play_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query("DELETE FROM play_actors WHERE play_id = $1")
        .bind(play_id)
        .execute(&mut **tx)
        .await?;

    if !genres.is_empty() {
        sqlx::query(
            "INSERT INTO play_genres (play_id, genre_id) SELECT $1, UNNEST($2::BIGINT[])"
        )
        .bind(play_id)
        .bind(genres.as_slice())
        .execute(&mut **tx)
        .await?;
    }

    if !actors.is_empty() {
        sqlx::query(
            "INSERT INTO play_actors (play_id, actor_id) SELECT $1, UNNEST($2::BIGINT[])"
        )
        .bind(play_id)
        .bind(actors.as_slice())
        .execute(&mut **tx)
        .await?;
    }

    Ok((genres, actors))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(id: i64, title: &str) -> Play {
        Play {
            id,
            title: title.to_string(),
            description: format!("{} description", title),
        }
    }

    #[test]
    fn list_view_uses_names_instead_of_ids() {
        let items = denormalize(
            vec![play(1, "Hamlet"), play(2, "Macbeth")],
            vec![(1, "Drama".into()), (1, "Tragedy".into()), (2, "Tragedy".into())],
            vec![(1, "Jane".into(), "Smith".into())],
        );

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].genres, vec!["Drama", "Tragedy"]);
        assert_eq!(items[0].actors, vec!["Jane Smith"]);
        assert_eq!(items[1].genres, vec!["Tragedy"]);
        assert!(items[1].actors.is_empty());
    }

    #[test]
    fn plays_without_relations_get_empty_lists() {
        let items = denormalize(vec![play(5, "Solo")], vec![], vec![]);
        let json = serde_json::to_value(&items[0]).unwrap();
        assert_eq!(json["genres"], serde_json::json!([]));
        assert_eq!(json["actors"], serde_json::json!([]));
        assert_eq!(json["title"], "Solo");
    }

    #[test]
    fn links_for_unknown_plays_are_ignored() {
        let items = denormalize(vec![play(1, "Hamlet")], vec![(9, "Drama".into())], vec![]);
        assert!(items[0].genres.is_empty());
    }

    #[test]
    fn relation_ids_are_sorted_and_deduplicated() {
        assert_eq!(normalize_ids(vec![3, 1, 3, 2, 1]), vec![1, 2, 3]);
    }

    #[test]
    fn relations_default_to_empty_on_input() {
        let input: PlayInput =
            serde_json::from_value(serde_json::json!({ "title": "Hamlet", "description": "" }))
                .unwrap();
        assert!(input.genres.is_empty() && input.actors.is_empty());
    }

    #[test]
    fn patch_keeps_relations_when_absent() {
        let current = PlayDetail {
            id: 1,
            title: "Hamlet".into(),
            description: "Classic".into(),
            genres: vec![1, 2],
            actors: vec![3],
        };
        let patch = PlayPatch {
            title: Some("Macbeth".into()),
            ..Default::default()
        };
        let merged = patch.apply(current);
        assert_eq!(merged.title, "Macbeth");
        assert_eq!(merged.genres, vec![1, 2]);
        assert_eq!(merged.actors, vec![3]);
    }
}
