use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use validator::ValidationErrors;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("request contains invalid fields")]
    InvalidFields(#[from] ValidationErrors),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(resource: &str, id: i64) -> Self {
        AppError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn unauthorized() -> Self {
        AppError::Unauthorized("Authentication credentials were not provided or are invalid".to_string())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) | AppError::InvalidFields(_) => "validation",
            AppError::Conflict(_) => "conflict",
            AppError::NotFound(_) => "not_found",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Database(_) | AppError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidFields(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let mut body = json!({
            "error": self.kind(),
            "message": message,
        });
        if let AppError::InvalidFields(errors) = &self {
            body["fields"] = field_messages(errors);
        }

        (status, Json(body)).into_response()
    }
}

// Ошибки ограничений Postgres превращаем в доменные
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let constraint = db.constraint().unwrap_or_default();
            match db.code().as_deref() {
                Some("23505") => return AppError::Conflict(unique_message(constraint)),
                Some("23503") => {
                    return AppError::NotFound(format!(
                        "Referenced {} does not exist",
                        referenced_entity(constraint)
                    ))
                }
                Some("23502") | Some("23514") => {
                    return AppError::Validation(db.message().to_string())
                }
                _ => {}
            }
        }

        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".to_string()),
            other => AppError::Database(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(_: PathRejection) -> Self {
        AppError::NotFound("Not found".to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::Internal(format!("password hashing failed: {}", err))
    }
}

fn unique_message(constraint: &str) -> String {
    match constraint {
        "genres_name_key" => "Genre with this name already exists".to_string(),
        "plays_title_key" => "Play with this title already exists".to_string(),
        "users_email_key" => "User with this email already exists".to_string(),
        "play_genres_pkey" | "play_actors_pkey" => "Duplicate relation in request".to_string(),
        _ => "Record violates a uniqueness constraint".to_string(),
    }
}

fn referenced_entity(constraint: &str) -> &'static str {
    const COLUMNS: [(&str, &str); 7] = [
        ("theatre_hall_id", "theatre hall"),
        ("performance_id", "performance"),
        ("reservation_id", "reservation"),
        ("genre_id", "genre"),
        ("actor_id", "actor"),
        ("user_id", "user"),
        ("play_id", "play"),
    ];
    COLUMNS
        .iter()
        .find(|(column, _)| constraint.contains(*column))
        .map(|(_, entity)| *entity)
        .unwrap_or("record")
}

fn field_messages(errors: &ValidationErrors) -> Value {
    let mut fields = Map::new();
    for (field, errs) in errors.field_errors() {
        let messages: Vec<Value> = errs
            .iter()
            .map(|e| {
                let text = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                Value::String(text)
            })
            .collect();
        fields.insert(field.to_string(), Value::Array(messages));
    }
    Value::Object(fields)
}
