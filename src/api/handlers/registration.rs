use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{requests::RegisterRequest, responses::RegisterResponse};
use crate::api::handlers::auth::set_session_cookie;
use crate::domain::models::{onboarding::Registration, tenant::normalize_email};
use crate::domain::services::auth_service::hash_password;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::info;

pub async fn register(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let registration = Registration {
        name: payload.name.trim().to_string(),
        email: normalize_email(&payload.email),
        password_hash: hash_password(&payload.password)?,
        phone: payload.phone.trim().to_string(),
        business_name: payload.business_name.trim().to_string(),
        business_address: payload.business_address,
    };

    let outcome = state.onboarding.register(registration).await?;
    set_session_cookie(&cookies, &outcome.token);

    info!(run_id = %outcome.run_id, tenant_id = %outcome.tenant.id, "Tenant registered");

    Ok((StatusCode::CREATED, Json(RegisterResponse {
        message: "User registered successfully".to_string(),
        token: outcome.token,
        github_repo: outcome.tenant.repo_link,
        build_url: outcome.tenant.build_url,
        client_secret: outcome.client_secret,
    })))
}
