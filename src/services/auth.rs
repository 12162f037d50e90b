//! Сервис аутентификации: хеширование паролей (bcrypt) и выпуск/проверка JWT.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{config::JwtConfig, error::AppError};

/// Полезная нагрузка токена доступа.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Идентификатор пользователя.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub.parse().map_err(|_| AppError::unauthorized())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub access: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn from_config(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: Duration::hours(config.expires_in_hours),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Понижает стоимость bcrypt (для тестов).
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    // bcrypt занимает CPU на сотни миллисекунд, уносим его с рабочих потоков tokio
    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("password hashing task failed: {}", e)))??;
        Ok(hash)
    }

    pub async fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        let password = password.to_string();
        let password_hash = password_hash.to_string();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash).unwrap_or(false))
            .await
            .unwrap_or(false)
    }

    pub fn issue_token(&self, user_id: i64) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let access = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {}", e)))?;

        debug!("Issued access token for user {}", user_id);
        Ok(IssuedToken {
            access,
            token_type: "Bearer",
            expires_in: self.ttl.num_seconds(),
        })
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Rejected access token: {}", e);
                AppError::unauthorized()
            })
    }
}
