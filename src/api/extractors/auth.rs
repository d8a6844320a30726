use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header, request::Parts},
};
use crate::state::AppState;
use crate::domain::models::admin::{is_admin_role, ROLE_SUPER_ADMIN};
use crate::domain::models::auth::{Claims, ROLE_TENANT, SESSION_COOKIE};
use crate::error::AppError;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::Span;

pub struct AuthSession(pub Claims);

impl AuthSession {
    pub fn is_tenant(&self) -> bool {
        self.0.role == ROLE_TENANT
    }

    pub fn is_admin(&self) -> bool {
        is_admin_role(&self.0.role)
    }
}

pub struct AdminSession(pub Claims);

impl AdminSession {
    pub fn is_super_admin(&self) -> bool {
        self.0.role == ROLE_SUPER_ADMIN
    }
}

fn session_token(parts: &Parts) -> Option<String> {
    let bearer = parts.headers.get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    parts.extensions.get::<Cookies>()
        .and_then(|cookies| cookies.get(SESSION_COOKIE))
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = session_token(parts).ok_or(AppError::Unauthorized)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let claims = app_state.auth_service.verify_token(&token)?;

        Span::current().record("role", claims.role.as_str());
        if claims.role == ROLE_TENANT {
            Span::current().record("tenant_id", claims.sub.as_str());
        }

        Ok(AuthSession(claims))
    }
}

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthSession(claims) = AuthSession::from_request_parts(parts, state).await?;
        if !is_admin_role(&claims.role) {
            return Err(AppError::Forbidden("Access denied".into()));
        }
        Ok(AdminSession(claims))
    }
}
