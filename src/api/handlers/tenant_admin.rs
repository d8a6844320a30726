use axum::{extract::{Path, State}, response::IntoResponse, Json};
use serde_json::json;
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{requests::UpdateTenantRequest, responses::{MessageResponse, UpdatedTenantResponse}};
use crate::api::extractors::auth::AdminSession;
use crate::domain::models::tenant::normalize_email;
use std::sync::Arc;
use tracing::info;

fn tenant_not_found() -> AppError {
    AppError::NotFound("User not found".into())
}

pub async fn get_all_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
) -> Result<impl IntoResponse, AppError> {
    let tenants = state.tenant_repo.list_by_active(true).await?;
    Ok(Json(tenants))
}

pub async fn get_deactivated_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
) -> Result<impl IntoResponse, AppError> {
    let tenants = state.tenant_repo.list_by_active(false).await?;
    Ok(Json(tenants))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = state.tenant_repo.find_by_id(&id).await?
        .ok_or_else(tenant_not_found)?;
    Ok(Json(tenant))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    admin: AdminSession,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTenantRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut tenant = state.tenant_repo.find_by_id(&id).await?
        .ok_or_else(tenant_not_found)?;

    if let Some(name) = payload.name { tenant.name = name.trim().to_string(); }
    if let Some(email) = payload.email { tenant.email = normalize_email(&email); }
    if let Some(phone) = payload.phone { tenant.phone = phone.trim().to_string(); }
    if let Some(business_name) = payload.business_name { tenant.business_name = business_name.trim().to_string(); }
    if let Some(address) = payload.business_address { tenant.business_address = address; }
    if let Some(plan) = payload.subscription_plan { tenant.subscription_plan = Some(plan); }

    let updated = state.tenant_repo.update(&tenant).await?;
    info!(admin_id = %admin.0.sub, "Updated tenant {}", updated.id);

    Ok(Json(UpdatedTenantResponse {
        message: "User updated successfully".to_string(),
        updated_user: updated,
    }))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    admin: AdminSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state.tenant_repo.delete(&id).await? {
        return Err(tenant_not_found());
    }
    info!(admin_id = %admin.0.sub, "Deleted tenant {}", id);
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

pub async fn deactivate_user(
    State(state): State<Arc<AppState>>,
    admin: AdminSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = state.tenant_repo.set_active(&id, false).await?
        .ok_or_else(tenant_not_found)?;
    info!(admin_id = %admin.0.sub, "Deactivated tenant {}", tenant.id);
    Ok(Json(json!({ "message": "User deactivated successfully", "user": tenant })))
}
