use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{requests::{SendMailRequest, VerifyCodeRequest}, responses::MessageResponse};
use std::sync::Arc;

pub async fn send_mail(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SendMailRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }

    state.verification.send_code(&payload.email).await?;
    Ok(Json(MessageResponse::new("Verification email sent to your account")))
}

pub async fn verify_code(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VerifyCodeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let Some(code) = payload.code.as_ref() else {
        return Err(AppError::Validation("Email and code are required".into()));
    };
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email and code are required".into()));
    }

    let verified = match code.as_code() {
        Some(code) => state.verification.verify_code(&payload.email, code).await?,
        None => false,
    };
    if !verified {
        return Err(AppError::Validation("Invalid email or verification code".into()));
    }

    Ok(Json(MessageResponse::new("Email verified successfully!")))
}
