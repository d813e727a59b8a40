use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::cart::UserId;
use crate::domain::user::Role;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Public,
    User,
    Admin,
}

impl From<Role> for Permission {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => Permission::Admin,
            Role::User => Permission::User,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: UserId,
    pub permission: Permission,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("No token provided. Please include a token in the Authorization header.")]
    MissingToken,
    #[error("Invalid token. Please provide a valid token.")]
    InvalidToken,
    #[error("Access denied. Insufficient permissions.")]
    Forbidden,
}

/// The verified identity behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    /// `None` for the shared public token.
    pub id: Option<UserId>,
    pub permission: Permission,
}

impl Principal {
    pub fn require(&self, allowed: &[Permission]) -> Result<(), AuthError> {
        if allowed.contains(&self.permission) {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

/// HS256 token verification, plus the shared public token.
#[derive(Clone)]
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    public_token: Option<String>,
    ttl_secs: i64,
}

impl JwtAuth {
    pub fn new(secret: &str, public_token: Option<String>, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            public_token,
            ttl_secs,
        }
    }

    pub fn issue(
        &self,
        id: UserId,
        permission: Permission,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            id,
            permission,
            iat,
            exp: iat + self.ttl_secs,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    pub fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        if self.public_token.as_deref() == Some(token) {
            return Ok(Principal {
                id: None,
                permission: Permission::Public,
            });
        }

        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|e| {
                debug!("rejected token: {e}");
                AuthError::InvalidToken
            })?;

        Ok(Principal {
            id: Some(data.claims.id),
            permission: data.claims.permission,
        })
    }
}

fn extract_bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

fn principal_from(req: &HttpRequest) -> Result<Principal, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("application state is not registered".to_string()))?;
    let token = extract_bearer_token(req).ok_or(AuthError::MissingToken)?;
    Ok(state.auth.verify(token)?)
}

impl FromRequest for Principal {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(principal_from(req))
    }
}

/// A signed-in user or admin. The public token is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub permission: Permission,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(principal_from(req).and_then(|principal| {
            principal.require(&[Permission::User, Permission::Admin])?;
            let id = principal.id.ok_or(AuthError::Forbidden)?;
            Ok(AuthenticatedUser {
                id,
                permission: principal.permission,
            })
        }))
    }
}
