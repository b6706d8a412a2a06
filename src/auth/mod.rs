//! Admin gate for catalog administration.
//!
//! A single shared passcode unlocks the catalog. A successful
//! [`AdminGate::authenticate`] yields an [`AdminSession`], the capability every
//! catalog mutation takes as an argument. Over HTTP the session travels as a
//! signed bearer token and is recovered by the [`AdminSession`] extractor.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AppConfig;

/// Passcode used when none is configured
pub const DEFAULT_ADMIN_PASSCODE: &str = "4312";

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    jti: String,
    iat: i64,
    exp: i64,
    iss: String,
    aud: String,
}

/// Proof that the caller presented the admin passcode.
///
/// Sessions can only be created by [`AdminGate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    id: Uuid,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl AdminSession {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

pub struct AdminGate {
    passcode: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    issuer: String,
    audience: String,
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("ttl", &self.ttl)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl AdminGate {
    pub fn new(
        passcode: impl Into<String>,
        secret: &str,
        ttl_secs: u64,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            passcode: passcode.into(),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(i64::try_from(ttl_secs).unwrap_or(i64::MAX / 1000)),
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.admin_passcode.clone(),
            &config.session_secret,
            config.session_ttl_secs,
            config.session_issuer.clone(),
            config.session_audience.clone(),
        )
    }

    /// Compares `password` with the configured passcode and opens a session
    /// on a match. There is no lockout.
    pub fn authenticate(&self, password: &str) -> Result<AdminSession, AuthError> {
        if password != self.passcode {
            warn!("admin authentication failed");
            return Err(AuthError::InvalidCredentials);
        }

        let issued_at = Utc::now();
        let session = AdminSession {
            id: Uuid::new_v4(),
            issued_at,
            expires_at: issued_at + self.ttl,
        };
        info!(session_id = %session.id, "admin session opened");
        Ok(session)
    }

    /// Signs a session into a bearer token
    pub fn issue_token(&self, session: &AdminSession) -> Result<String, AuthError> {
        let claims = SessionClaims {
            sub: "admin".to_string(),
            jti: session.id.to_string(),
            iat: session.issued_at.timestamp(),
            exp: session.expires_at.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Recovers the session carried by a bearer token
    pub fn verify_token(&self, token: &str) -> Result<AdminSession, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        validation.leeway = 0;

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })?
            .claims;

        let id = Uuid::parse_str(&claims.jti).map_err(|_| AuthError::InvalidToken)?;
        let issued_at = Utc
            .timestamp_opt(claims.iat, 0)
            .single()
            .ok_or(AuthError::InvalidToken)?;
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or(AuthError::InvalidToken)?;

        Ok(AdminSession {
            id,
            issued_at,
            expires_at,
        })
    }
}

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message): (StatusCode, &str, String) = match &self {
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_CREDENTIALS",
                "Invalid credentials".to_string(),
            ),
            Self::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_MISSING_TOKEN",
                "No authentication token provided".to_string(),
            ),
            Self::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_TOKEN",
                "Invalid authentication token".to_string(),
            ),
            Self::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "AUTH_TOKEN_EXPIRED",
                "Token has expired".to_string(),
            ),
            Self::TokenCreation(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_TOKEN_CREATION_FAILED",
                "Could not issue session token".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": {
                "code": error_code,
                "message": error_message,
            }
        }));

        (status, body).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    Arc<AdminGate>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = Arc::<AdminGate>::from_ref(state);
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::InvalidToken)?;

        gate.verify_token(token)
    }
}
