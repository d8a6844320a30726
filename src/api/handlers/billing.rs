use axum::{body::Bytes, extract::State, http::HeaderMap, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{requests::CheckoutSessionRequest, responses::{CheckoutSessionResponse, WebhookAck}};
use crate::api::extractors::auth::AuthSession;
use crate::domain::models::billing::TRIAL_PERIOD_DAYS;
use crate::domain::services::onboarding::TRIAL_PLAN;
use std::sync::Arc;
use tracing::{info, warn};

pub const SIGNATURE_HEADER: &str = "stripe-signature";

pub async fn create_checkout_session(
    State(state): State<Arc<AppState>>,
    session: AuthSession,
    Json(payload): Json<CheckoutSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.user_id.trim().is_empty() {
        return Err(AppError::Validation("Invalid user ID".into()));
    }
    if session.is_tenant() && session.0.sub != payload.user_id {
        return Err(AppError::Forbidden("Access denied".into()));
    }

    let tenant = state.tenant_repo.find_by_id(&payload.user_id).await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    let customer_id = tenant.stripe_customer_id.as_deref()
        .ok_or_else(|| AppError::Validation("User has no billing customer".into()))?;

    let trial_days = if tenant.subscription_plan.as_deref() == Some(TRIAL_PLAN) { TRIAL_PERIOD_DAYS } else { 0 };
    let url = state.billing_service.create_checkout_session(customer_id, trial_days).await?;

    info!(tenant_id = %tenant.id, trial_days, "Checkout session created");
    Ok(Json(CheckoutSessionResponse { url }))
}

pub async fn webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let signature = headers.get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Signature("Missing Stripe-Signature header".into()))?;

    let event = state.billing_service.construct_event(&body, signature).inspect_err(|e| {
        warn!("Webhook signature verification failed: {}", e);
    })?;

    let outcome = state.billing_events.handle(&event).await?;
    info!(event_id = %event.id, event_type = %event.event_type, outcome = ?outcome, "Billing event processed");

    Ok(Json(WebhookAck { received: true }))
}
