use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::User,
};

const TOKEN_LIFETIME_DAYS: i64 = 30;

/// Bearer token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub username: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Issues and verifies bearer tokens signed with the process-wide secret
///
/// One verification primitive, two callers: `authenticate` turns any failure
/// into a 401 for protected endpoints, while `resolve_optional` turns every
/// failure into "no identity" so the recommendation path never rejects a
/// request over a bad token.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issues a token valid for 30 days
    pub fn issue(&self, user_id: i64, username: &str) -> AppResult<String> {
        let claims = Claims {
            user_id,
            username: username.to_string(),
            exp: (Utc::now() + Duration::days(TOKEN_LIFETIME_DAYS)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {e}")))
    }

    /// Verifies signature and expiry, returning the claims or the reason
    fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default()).map(|data| data.claims)
    }

    /// Permissive resolve: the acting user id, or `None` for a missing,
    /// malformed, or expired token. Never fails the request.
    pub fn resolve_optional(&self, headers: &HeaderMap) -> Option<i64> {
        let token = bearer_token(headers)?;
        match self.verify(token) {
            Ok(claims) => Some(claims.user_id),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unusable bearer token");
                None
            }
        }
    }

    /// Strict resolve: the active user behind the token, or a 401
    pub async fn authenticate(&self, headers: &HeaderMap, store: &dyn Store) -> AppResult<User> {
        let header = headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Token is missing".to_string()))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid token format".to_string()))?;

        let claims = self.verify(token).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => {
                AppError::Unauthorized("Token has expired".to_string())
            }
            _ => AppError::Unauthorized("Invalid token".to_string()),
        })?;

        match store.user(claims.user_id).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(AppError::Unauthorized(
                "User not found or inactive".to_string(),
            )),
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}
