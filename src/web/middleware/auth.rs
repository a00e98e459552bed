//! JWT authentication middleware.

use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{header, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::web::error::ApiError;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID).
    pub sub: i64,
    pub username: String,
    /// Issued at (unix seconds).
    pub iat: u64,
    /// Expiration (unix seconds).
    pub exp: u64,
    /// Unique token ID.
    pub jti: String,
}

/// Keys and settings for issuing and checking access tokens (HS256).
#[derive(Clone)]
pub struct JwtState {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    /// Access token lifetime in seconds.
    pub access_token_expiry: u64,
}

impl JwtState {
    pub fn new(secret: &str, access_token_expiry: u64) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_token_expiry,
        }
    }

    /// Issue an access token for a user.
    pub fn issue(&self, user_id: i64, username: &str) -> Result<String, ApiError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = JwtClaims {
            sub: user_id,
            username: username.to_string(),
            iat: now,
            exp: now + self.access_token_expiry,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            ApiError::internal("Failed to generate token")
        })
    }

    /// Decode and validate a token.
    pub fn verify(&self, token: &str) -> Result<JwtClaims, ApiError> {
        decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("JWT validation failed: {}", e);
                ApiError::unauthorized("Invalid or expired token")
            })
    }
}

/// Extractor for authenticated users.
///
/// Rejects with 401 when the bearer token is missing, malformed or expired.
#[derive(Debug, Clone)]
pub struct AuthUser(pub JwtClaims);

impl AuthUser {
    pub fn user_id(&self) -> i64 {
        self.0.sub
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::unauthorized("Missing authorization"))?;

        let jwt_state = parts
            .extensions
            .get::<Arc<JwtState>>()
            .ok_or_else(|| ApiError::internal("JWT state not configured"))?;

        Ok(AuthUser(jwt_state.verify(bearer.token())?))
    }
}

/// Optional authentication extractor.
///
/// No `Authorization` header yields `None` and the request proceeds
/// anonymously. A header that is present but malformed or expired is
/// rejected with 401 like [`AuthUser`].
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<JwtClaims>);

impl OptionalAuthUser {
    pub fn user_id(&self) -> Option<i64> {
        self.0.as_ref().map(|c| c.sub)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Ok(OptionalAuthUser(None));
        }
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        Ok(OptionalAuthUser(Some(claims)))
    }
}

/// Middleware that makes the JWT state available to the extractors.
pub async fn jwt_auth(
    jwt_state: Arc<JwtState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(jwt_state);
    next.run(request).await
}
