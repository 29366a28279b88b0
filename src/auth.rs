//! Session verification.
//!
//! Sign-in itself happens at the identity provider. Requests carry the
//! provider's session JWT either as a bearer token or in the `__session`
//! cookie; the `sub` claim is the user id that scopes every query.

use crate::errors::AppError;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use axum_extra::extract::CookieJar;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

pub const SESSION_COOKIE: &str = "__session";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("session token required")]
    MissingToken,
    #[error("session token has no subject")]
    MissingSubject,
    #[error(transparent)]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Key material used to verify session tokens.
#[derive(Clone)]
pub enum AuthKey {
    /// Shared HS256 secret.
    Secret(String),
    /// RS256 public key in PEM form, as published by the identity provider.
    PublicKeyPem(String),
}

impl std::fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthKey::Secret(_) => f.write_str("Secret(..)"),
            AuthKey::PublicKeyPem(_) => f.write_str("PublicKeyPem(..)"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

pub struct Authenticator {
    key: DecodingKey,
    validation: Validation,
}

impl Authenticator {
    pub fn new(key: &AuthKey, issuer: Option<&str>) -> Result<Self, AuthError> {
        let (key, mut validation) = match key {
            AuthKey::Secret(secret) => (
                DecodingKey::from_secret(secret.as_bytes()),
                Validation::new(Algorithm::HS256),
            ),
            AuthKey::PublicKeyPem(pem) => (
                DecodingKey::from_rsa_pem(pem.as_bytes())?,
                Validation::new(Algorithm::RS256),
            ),
        };
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        Ok(Self { key, validation })
    }

    /// Verify a token and return its user id.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let claims = decode::<Claims>(token, &self.key, &self.validation)?.claims;
        if claims.sub.trim().is_empty() {
            return Err(AuthError::MissingSubject);
        }
        Ok(claims.sub)
    }
}

/// Pull the session token from the request, bearer header first.
fn session_token(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    bearer.or_else(|| {
        CookieJar::from_headers(&parts.headers)
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    })
}

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<Authenticator>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authenticator = Arc::<Authenticator>::from_ref(state);
        let token = session_token(parts).ok_or(AuthError::MissingToken)?;
        let user_id = authenticator.verify(&token)?;
        Ok(AuthUser { user_id })
    }
}
