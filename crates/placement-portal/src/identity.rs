//! Bearer-credential boundary. Tokens are issued elsewhere; the portal only
//! resolves them to a principal and checks roles.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    SuperAdmin,
    Company,
    Student,
}

impl Role {
    pub const fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

/// Authenticated caller: the id is a student, company or admin identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub role: Role,
}

impl Principal {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    /// Admins act on anyone's behalf; everybody else only on their own.
    pub fn may_act_for(&self, role: Role, id: &str) -> bool {
        self.role.is_admin() || (self.role == role && self.id == id)
    }
}

/// Resolves bearer tokens to principals.
pub trait IdentityProvider: Send + Sync {
    fn resolve(&self, token: &str) -> Option<Principal>;
}

/// Request extension carrying the active provider.
pub type SharedIdentity = Arc<dyn IdentityProvider>;

/// Token table for the API binary and tests.
#[derive(Default)]
pub struct TokenRegistry {
    tokens: RwLock<HashMap<String, Principal>>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, token: impl Into<String>, principal: Principal) {
        if let Ok(mut tokens) = self.tokens.write() {
            tokens.insert(token.into(), principal);
        }
    }
}

impl IdentityProvider for TokenRegistry {
    fn resolve(&self, token: &str) -> Option<Principal> {
        self.tokens.read().ok()?.get(token).cloned()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityRejection {
    #[error("authentication required")]
    MissingCredentials,
    #[error("invalid token")]
    InvalidToken,
    #[error("identity provider not configured")]
    Unconfigured,
    #[error("{0}")]
    Forbidden(&'static str),
}

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        let status = match self {
            IdentityRejection::MissingCredentials | IdentityRejection::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            IdentityRejection::Forbidden(_) => StatusCode::FORBIDDEN,
            IdentityRejection::Unconfigured => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let provider = parts
            .extensions
            .get::<SharedIdentity>()
            .cloned()
            .ok_or(IdentityRejection::Unconfigured)?;

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(IdentityRejection::MissingCredentials)?;

        provider.resolve(token).ok_or(IdentityRejection::InvalidToken)
    }
}

/// Principal holding the admin or superadmin role.
#[derive(Debug, Clone)]
pub struct AdminPrincipal(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AdminPrincipal
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let principal = Principal::from_request_parts(parts, state).await?;
        if principal.role.is_admin() {
            Ok(AdminPrincipal(principal))
        } else {
            Err(IdentityRejection::Forbidden("admin access required"))
        }
    }
}
