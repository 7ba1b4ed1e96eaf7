//! Authentication Middleware
//!
//! Bearer JWT validation for protected routes and the guide-role gate.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Principal, Role, UserId};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Token subject as issued by the identity service: a JSON number or a
/// numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subject {
    Number(i64),
    Text(String),
}

impl Subject {
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Number(n) => Some(UserId(*n)),
            Self::Text(s) => s.parse().ok(),
        }
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Subject,
    /// Expiration time (Unix timestamp), checked when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims.clear();
    validation
}

/// Decode and verify a bearer token.
pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::Unauthorized("Token expired".into()),
        _ => {
            debug!(error = %e, "Rejected token");
            AppError::Unauthorized("Invalid token".into())
        }
    })
}

/// Authentication middleware that validates JWT tokens and attaches a
/// [`Principal`] to the request.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authorization header required".into()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header format".into()))?;

    let claims = decode_claims(token, &state.settings.jwt.secret)?;

    let user_id = claims
        .sub
        .user_id()
        .ok_or_else(|| AppError::Unauthorized("Invalid user_id in token".into()))?;

    let mut role = claims.role.as_deref().and_then(Role::parse);

    if role.is_none() {
        if let Some(resolver) = &state.role_resolver {
            role = resolver.resolve_role(user_id).await.map_err(|e| {
                warn!(user_id = %user_id, error = %e, "Role lookup failed");
                AppError::Unauthorized("Failed to fetch user role".into())
            })?;
        }
    }

    let principal = Principal {
        user_id,
        role,
        username: claims.username,
    };
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Rejects callers without the guide role. Runs after [`auth_middleware`].
pub async fn require_guide(request: Request, next: Next) -> Result<Response, AppError> {
    let principal = request
        .extensions()
        .get::<Principal>()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".into()))?;

    if !principal.is_guide() {
        debug!(user_id = %principal.user_id, role = ?principal.role, "Guide role required");
        return Err(AppError::Forbidden("Insufficient permissions".into()));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn sign(claims: &serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_numeric_and_string_subjects_agree() {
        let a = decode_claims(&sign(&serde_json::json!({ "sub": 42 })), SECRET).unwrap();
        let b = decode_claims(&sign(&serde_json::json!({ "sub": "42" })), SECRET).unwrap();
        assert_eq!(a.sub.user_id(), Some(UserId(42)));
        assert_eq!(a.sub.user_id(), b.sub.user_id());
    }

    #[test]
    fn test_non_numeric_subject() {
        let claims = decode_claims(&sign(&serde_json::json!({ "sub": "alice" })), SECRET).unwrap();
        assert_eq!(claims.sub.user_id(), None);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign(&serde_json::json!({ "sub": 1 }));
        let err = decode_claims(&token, "another-secret-another-secret-xx").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = sign(&serde_json::json!({ "sub": 1, "exp": 1_000 }));
        match decode_claims(&token, SECRET).unwrap_err() {
            AppError::Unauthorized(msg) => assert_eq!(msg, "Token expired"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_optional_claims_carried() {
        let token = sign(&serde_json::json!({
            "sub": "7",
            "role": "Vodic",
            "username": "marko",
            "email": "marko@example.com",
        }));
        let claims = decode_claims(&token, SECRET).unwrap();
        assert_eq!(claims.role.as_deref().and_then(Role::parse), Some(Role::Guide));
        assert_eq!(claims.username.as_deref(), Some("marko"));
    }
}
