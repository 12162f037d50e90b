use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use base64::{engine::general_purpose, Engine as _};
use std::sync::Arc;
use tracing::debug;

use crate::{error::AppError, models::User, AppState};

/// Аутентифицированный пользователь запроса.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
}

#[derive(Debug, PartialEq)]
enum Scheme<'a> {
    Bearer(&'a str),
    Basic { email: String, password: String },
}

// Разбираем заголовок Authorization: Bearer <jwt> или Basic base64(email:password)
fn parse_authorization(value: &str) -> Result<Scheme<'_>, AppError> {
    if let Some(token) = value.strip_prefix("Bearer ") {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::unauthorized());
        }
        return Ok(Scheme::Bearer(token));
    }

    let encoded = value
        .strip_prefix("Basic ")
        .ok_or_else(AppError::unauthorized)?;

    let decoded = general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|_| AppError::unauthorized())?;

    let credentials = String::from_utf8(decoded).map_err(|_| AppError::unauthorized())?;

    let (email, password) = credentials
        .split_once(':')
        .ok_or_else(AppError::unauthorized)?;

    Ok(Scheme::Basic {
        email: email.to_string(),
        password: password.to_string(),
    })
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(AppError::unauthorized)?;

        let user = match parse_authorization(auth_header)? {
            Scheme::Bearer(token) => {
                let claims = state.auth.verify_token(token)?;
                User::find_active(claims.user_id()?, &state.db).await?
            }
            Scheme::Basic { email, password } => match User::find_by_email(&email, &state.db).await? {
                Some(user) if user.is_active => state
                    .auth
                    .verify_password(&password, &user.password_hash)
                    .await
                    .then_some(user),
                _ => None,
            },
        };

        let user = user.ok_or_else(|| {
            debug!("Rejected credentials for {} {}", parts.method, parts.uri.path());
            AppError::unauthorized()
        })?;

        Ok(AuthUser { user_id: user.id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(parse_authorization("Bearer abc.def.ghi").unwrap(), Scheme::Bearer("abc.def.ghi"));
    }

    #[test]
    fn empty_bearer_is_rejected() {
        assert!(parse_authorization("Bearer   ").is_err());
    }

    #[test]
    fn basic_credentials_are_decoded() {
        let encoded = general_purpose::STANDARD.encode("testuser@test.com:pass:word");
        let header = format!("Basic {}", encoded);
        let scheme = parse_authorization(&header).unwrap();
        assert_eq!(
            scheme,
            Scheme::Basic {
                email: "testuser@test.com".into(),
                password: "pass:word".into(),
            }
        );
    }

    #[test]
    fn basic_without_colon_is_rejected() {
        let encoded = general_purpose::STANDARD.encode("no-separator");
        assert!(parse_authorization(&format!("Basic {}", encoded)).is_err());
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        let err = parse_authorization("Digest realm=x").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
