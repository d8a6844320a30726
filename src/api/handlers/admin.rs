use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{
    requests::{CreateAdminRequest, LoginRequest, UpdateAdminRequest},
    responses::{AdminLoginResponse, CreatedAdminResponse, MessageResponse, UpdatedAdminResponse},
};
use crate::api::extractors::auth::AdminSession;
use crate::api::handlers::auth::{clear_session_cookie, invalid_credentials, set_session_cookie};
use crate::domain::models::admin::{AdminUser, ROLE_SUPER_ADMIN};
use crate::domain::models::tenant::normalize_email;
use crate::domain::services::auth_service::{hash_password, verify_password};
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::info;

fn admin_not_found() -> AppError {
    AppError::NotFound("Admin user not found".into())
}

fn require_super_admin(admin: &AdminSession) -> Result<(), AppError> {
    if !admin.is_super_admin() {
        return Err(AppError::Forbidden("Only a super-admin can manage super-admin accounts".into()));
    }
    Ok(())
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let admin = state.admin_repo.find_by_email(&normalize_email(&payload.email)).await?
        .ok_or_else(invalid_credentials)?;
    if !verify_password(&payload.password, &admin.password_hash)? {
        return Err(invalid_credentials());
    }

    let token = state.auth_service.issue_token(&admin.id, &admin.role)?;
    set_session_cookie(&cookies, &token);

    info!("Admin logged in: {}", admin.id);

    Ok(Json(AdminLoginResponse { message: "Logged in successfully".to_string(), token }))
}

pub async fn logout(cookies: Cookies) -> impl IntoResponse {
    clear_session_cookie(&cookies);
    Json(MessageResponse::new("Logged out successfully"))
}

pub async fn list_admins(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.admin_repo.list().await?))
}

pub async fn get_admin(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let admin = state.admin_repo.find_by_id(&id).await?
        .ok_or_else(admin_not_found)?;
    Ok(Json(admin))
}

pub async fn create_admin(
    State(state): State<Arc<AppState>>,
    session: AdminSession,
    Json(payload): Json<CreateAdminRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    if payload.role.as_deref() == Some(ROLE_SUPER_ADMIN) {
        require_super_admin(&session)?;
    }

    let email = normalize_email(&payload.email);
    if state.admin_repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Admin user already exists".into()));
    }

    let admin = AdminUser::new(
        payload.name.trim().to_string(),
        email,
        hash_password(&payload.password)?,
        payload.role,
    );
    let created = state.admin_repo.create(&admin).await?;

    info!(created_by = %session.0.sub, "Created admin {} with role {}", created.id, created.role);

    Ok((StatusCode::CREATED, Json(CreatedAdminResponse {
        message: "Admin user created successfully".to_string(),
        new_admin: created,
    })))
}

pub async fn update_admin(
    State(state): State<Arc<AppState>>,
    session: AdminSession,
    Path(id): Path<String>,
    Json(payload): Json<UpdateAdminRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut admin = state.admin_repo.find_by_id(&id).await?
        .ok_or_else(admin_not_found)?;
    if admin.role == ROLE_SUPER_ADMIN || payload.role.as_deref() == Some(ROLE_SUPER_ADMIN) {
        require_super_admin(&session)?;
    }

    if let Some(name) = payload.name { admin.name = name.trim().to_string(); }
    if let Some(email) = payload.email { admin.email = normalize_email(&email); }
    if let Some(password) = payload.password { admin.password_hash = hash_password(&password)?; }
    if let Some(role) = payload.role { admin.role = role; }

    let updated = state.admin_repo.update(&admin).await?;
    info!(updated_by = %session.0.sub, "Updated admin {}", updated.id);

    Ok(Json(UpdatedAdminResponse {
        message: "Admin user updated successfully".to_string(),
        updated_admin: updated,
    }))
}

pub async fn delete_admin(
    State(state): State<Arc<AppState>>,
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if session.0.sub == id {
        return Err(AppError::Conflict("Cannot delete yourself".into()));
    }

    let target = state.admin_repo.find_by_id(&id).await?
        .ok_or_else(admin_not_found)?;
    if target.role == ROLE_SUPER_ADMIN {
        require_super_admin(&session)?;
    }

    state.admin_repo.delete(&target.id).await?;
    info!(deleted_by = %session.0.sub, "Deleted admin {}", target.id);

    Ok(Json(MessageResponse::new("Admin user deleted successfully")))
}
