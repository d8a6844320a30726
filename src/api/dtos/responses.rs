use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::models::{
    admin::AdminUser,
    onboarding::{OnboardingRun, ProvisionedResources},
    support::{SupportMessage, SupportTicket},
    tenant::Tenant,
};

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self { message: message.to_string() }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub token: String,
    pub github_repo: String,
    pub build_url: String,
    pub client_secret: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    #[serde(rename = "restaurantID")]
    pub restaurant_id: Option<String>,
    pub build_url: String,
}

#[derive(Serialize)]
pub struct AdminLoginResponse {
    pub message: String,
    pub token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedTenantResponse {
    pub message: String,
    pub updated_user: Tenant,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAdminResponse {
    pub message: String,
    pub new_admin: AdminUser,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedAdminResponse {
    pub message: String,
    pub updated_admin: AdminUser,
}

#[derive(Serialize)]
pub struct CheckoutSessionResponse {
    pub url: String,
}

#[derive(Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTicketResponse {
    pub message: String,
    pub new_support_ticket: SupportTicket,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedTicketResponse {
    pub message: String,
    pub updated_support_ticket: SupportTicket,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePostedResponse {
    pub message: String,
    pub support_message: SupportMessage,
}

#[derive(Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<SupportMessage>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRunResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub state: String,
    pub finished: bool,
    pub resources: ProvisionedResources,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OnboardingRun> for OnboardingRunResponse {
    fn from(run: OnboardingRun) -> Self {
        Self {
            finished: run.is_finished(),
            resources: run.resources(),
            id: run.id,
            email: run.email,
            state: run.state,
            error: run.error,
            created_at: run.created_at,
            updated_at: run.updated_at,
        }
    }
}
