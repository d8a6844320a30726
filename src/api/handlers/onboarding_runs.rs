use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use serde::Deserialize;
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::responses::OnboardingRunResponse;
use crate::api::extractors::auth::AdminSession;
use crate::domain::models::tenant::normalize_email;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ListRunsParams {
    pub email: Option<String>,
}

// Runs for one registration email, newest first.
pub async fn list_runs(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Query(params): Query<ListRunsParams>,
) -> Result<impl IntoResponse, AppError> {
    let email = params.email
        .map(|email| normalize_email(&email))
        .filter(|email| !email.is_empty())
        .ok_or_else(|| AppError::Validation("Email is required".into()))?;

    let runs = state.onboarding_repo.list_by_email(&email).await?;
    Ok(Json(runs.into_iter().map(OnboardingRunResponse::from).collect::<Vec<_>>()))
}

pub async fn get_run(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let run = state.onboarding_repo.find_by_id(&id).await?
        .ok_or_else(|| AppError::NotFound("Onboarding run not found".into()))?;
    Ok(Json(OnboardingRunResponse::from(run)))
}
