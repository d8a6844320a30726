use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{
    requests::{CreateTicketRequest, PostMessageRequest, UpdateTicketRequest},
    responses::{CreatedTicketResponse, MessagePostedResponse, MessageResponse, MessagesResponse, UpdatedTicketResponse},
};
use crate::api::extractors::auth::{AdminSession, AuthSession};
use crate::domain::models::support::{Sender, SenderKind, SupportMessage, SupportTicket};
use std::sync::Arc;
use tracing::info;

fn ticket_not_found() -> AppError {
    AppError::NotFound("Support ticket not found".into())
}

fn ensure_ticket_access(session: &AuthSession, ticket: &SupportTicket) -> Result<(), AppError> {
    if session.is_tenant() && session.0.sub != ticket.tenant_id {
        return Err(AppError::Forbidden("Access denied".into()));
    }
    Ok(())
}

async fn load_ticket(state: &AppState, session: &AuthSession, id: &str) -> Result<SupportTicket, AppError> {
    let ticket = state.support_repo.find_ticket(id).await?
        .ok_or_else(ticket_not_found)?;
    ensure_ticket_access(session, &ticket)?;
    Ok(ticket)
}

async fn resolve_sender(state: &AppState, session: &AuthSession) -> Result<Sender, AppError> {
    let sender_not_found = || AppError::NotFound("Sender not found".into());

    if session.is_admin() {
        let admin = state.admin_repo.find_by_id(&session.0.sub).await?
            .ok_or_else(sender_not_found)?;
        return Ok(Sender { kind: SenderKind::Admin, id: admin.id, name: admin.name, email: admin.email });
    }

    let tenant = state.tenant_repo.find_by_id(&session.0.sub).await?
        .ok_or_else(sender_not_found)?;
    Ok(Sender { kind: SenderKind::User, id: tenant.id, name: tenant.name, email: tenant.email })
}

pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    session: AuthSession,
    Json(payload): Json<CreateTicketRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    if session.is_tenant() && session.0.sub != payload.user_id {
        return Err(AppError::Forbidden("Access denied".into()));
    }

    let tenant = state.tenant_repo.find_by_id(&payload.user_id).await?
        .ok_or_else(|| AppError::NotFound("User not found. Cannot create support ticket.".into()))?;

    let ticket = SupportTicket::new(tenant.id, payload.subject.trim().to_string(), payload.message);
    let created = state.support_repo.create_ticket(&ticket).await?;
    info!(tenant_id = %created.tenant_id, "Support ticket {} opened", created.id);

    Ok((StatusCode::CREATED, Json(CreatedTicketResponse {
        message: "Support ticket created successfully".to_string(),
        new_support_ticket: created,
    })))
}

pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.support_repo.list_tickets().await?))
}

pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    session: AuthSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = load_ticket(&state, &session, &id).await?;
    Ok(Json(ticket))
}

pub async fn list_tickets_by_user(
    State(state): State<Arc<AppState>>,
    session: AuthSession,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if session.is_tenant() && session.0.sub != user_id {
        return Err(AppError::Forbidden("Access denied".into()));
    }
    if state.tenant_repo.find_by_id(&user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found.".into()));
    }

    let tickets = state.support_repo.list_tickets_by_tenant(&user_id).await?;
    if tickets.is_empty() {
        return Err(AppError::NotFound("No support tickets found for this user.".into()));
    }
    Ok(Json(tickets))
}

pub async fn update_ticket(
    State(state): State<Arc<AppState>>,
    admin: AdminSession,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTicketRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut ticket = state.support_repo.find_ticket(&id).await?
        .ok_or_else(ticket_not_found)?;
    if let Some(subject) = payload.subject { ticket.subject = subject.trim().to_string(); }
    if let Some(message) = payload.message { ticket.message = message; }
    if let Some(status) = payload.status { ticket.status = status; }

    let updated = state.support_repo.update_ticket(&ticket).await?;
    info!(admin_id = %admin.0.sub, status = %updated.status, "Support ticket {} updated", updated.id);

    Ok(Json(UpdatedTicketResponse {
        message: "Support ticket updated successfully".to_string(),
        updated_support_ticket: updated,
    }))
}

pub async fn delete_ticket(
    State(state): State<Arc<AppState>>,
    admin: AdminSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state.support_repo.delete_ticket(&id).await? {
        return Err(ticket_not_found());
    }
    info!(admin_id = %admin.0.sub, "Support ticket {} deleted", id);
    Ok(Json(MessageResponse::new("Support ticket deleted successfully")))
}

pub async fn post_message(
    State(state): State<Arc<AppState>>,
    session: AuthSession,
    Path(id): Path<String>,
    Json(payload): Json<PostMessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.content.trim().is_empty() {
        return Err(AppError::Validation("Message content is required".into()));
    }

    let ticket = load_ticket(&state, &session, &id).await?;
    let sender = resolve_sender(&state, &session).await?;

    let message = SupportMessage::new(ticket.id, sender, payload.content);
    let stored = state.support_repo.add_message(&message).await?;
    info!(sender_kind = %stored.sender.kind, "Message added to support ticket {}", stored.ticket_id);

    Ok(Json(MessagePostedResponse {
        message: "Message sent successfully".to_string(),
        support_message: stored,
    }))
}

pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    session: AuthSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = load_ticket(&state, &session, &id).await?;
    let messages = state.support_repo.list_messages(&ticket.id).await?;
    Ok(Json(MessagesResponse { messages }))
}
