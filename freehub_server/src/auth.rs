//! Bearer token authentication.
//!
//! Access tokens are HS256 JWTs carrying the user's id (`sub`), display name and email. Handlers that need an
//! authenticated user take a [`JwtClaims`] argument; the extractor validates the `Authorization: Bearer` header
//! against the [`TokenIssuer`] registered as app data.
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use freehub_engine::db_types::{UserId, UserProfile};
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: i64,
    pub name: String,
    pub email: String,
    pub exp: i64,
}

impl JwtClaims {
    pub fn user_id(&self) -> UserId {
        UserId(self.sub)
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile::new(self.user_id(), self.name.as_str(), self.email.as_str())
    }
}

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.reveal().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            lifetime: config.token_lifetime,
        }
    }

    /// Issues a signed access token for `user`, valid for `lifetime`, or the configured token lifetime if `None`.
    pub fn issue_token(&self, user: &UserProfile, lifetime: Option<Duration>) -> Result<String, AuthError> {
        let exp = Utc::now() + lifetime.unwrap_or(self.lifetime);
        let claims =
            JwtClaims { sub: user.id.value(), name: user.name.clone(), email: user.email.clone(), exp: exp.timestamp() };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::CouldNotIssueToken(e.to_string()))
    }

    pub fn validate(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                    AuthError::PoorlyFormattedToken(e.to_string())
                },
                _ => AuthError::ValidationError(e.to_string()),
            }
        })?;
        if data.claims.sub <= 0 {
            return Err(AuthError::ValidationError(format!("{} is not a valid user id", data.claims.sub)));
        }
        Ok(data.claims)
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req.headers().get(header::AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let value = value.to_str().map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::PoorlyFormattedToken("Expected a bearer token".into()))
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<TokenIssuer>>() {
            Some(issuer) => bearer_token(req).and_then(|token| issuer.validate(token)).map_err(|e| {
                debug!("💻️ Rejected request to {}. {e}", req.path());
                ServerError::from(e)
            }),
            None => {
                error!("💻️ No token issuer has been configured. Authenticated routes cannot be served.");
                Err(ServerError::ConfigurationError("Token issuer is not configured".into()))
            },
        };
        ready(result)
    }
}
