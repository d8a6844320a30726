use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{requests::LoginRequest, responses::{LoginResponse, MessageResponse}};
use crate::domain::models::{auth::{ROLE_TENANT, SESSION_COOKIE}, tenant::normalize_email};
use crate::domain::services::auth_service::{verify_password, SESSION_TTL_DAYS};
use std::sync::Arc;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use tracing::info;

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tenant = state.tenant_repo.find_by_email(&normalize_email(&payload.email)).await?
        .ok_or_else(invalid_credentials)?;
    if !verify_password(&payload.password, &tenant.password_hash)? {
        return Err(invalid_credentials());
    }

    let token = state.auth_service.issue_token(&tenant.id, ROLE_TENANT)?;
    set_session_cookie(&cookies, &token);

    info!("Tenant logged in: {}", tenant.id);

    Ok(Json(LoginResponse {
        message: "Logged in successfully".to_string(),
        token,
        restaurant_id: tenant.restaurant_id,
        build_url: tenant.build_url,
    }))
}

pub async fn logout(cookies: Cookies) -> impl IntoResponse {
    clear_session_cookie(&cookies);
    Json(MessageResponse::new("Logged out successfully"))
}

pub fn invalid_credentials() -> AppError {
    AppError::Validation("Invalid email or password".into())
}

pub fn set_session_cookie(cookies: &Cookies, token: &str) {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_http_only(true);
    cookie.set_secure(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    cookie.set_max_age(Duration::days(SESSION_TTL_DAYS));
    cookies.add(cookie);
}

pub fn clear_session_cookie(cookies: &Cookies) {
    cookies.remove(Cookie::build((SESSION_COOKIE, "")).path("/").into());
}
