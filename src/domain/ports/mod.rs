use crate::domain::models::{
    admin::AdminUser, billing::{BillingEvent, CustomerProfile, TrialSubscription},
    onboarding::OnboardingRun, support::{SupportMessage, SupportTicket},
    tenant::{SubscriptionUpdate, Tenant}, verification::EmailVerification,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn create(&self, tenant: &Tenant) -> Result<Tenant, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Tenant>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Tenant>, AppError>;
    async fn find_by_subscription_id(&self, subscription_id: &str) -> Result<Option<Tenant>, AppError>;
    async fn find_by_customer_id(&self, customer_id: &str) -> Result<Option<Tenant>, AppError>;
    async fn list_by_active(&self, is_active: bool) -> Result<Vec<Tenant>, AppError>;
    async fn update(&self, tenant: &Tenant) -> Result<Tenant, AppError>;
    /// `None` dates leave the stored ones in place.
    async fn apply_subscription_update(&self, id: &str, update: &SubscriptionUpdate) -> Result<(), AppError>;
    async fn set_active(&self, id: &str, is_active: bool) -> Result<Option<Tenant>, AppError>;
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn create(&self, admin: &AdminUser) -> Result<AdminUser, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<AdminUser>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminUser>, AppError>;
    async fn list(&self) -> Result<Vec<AdminUser>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
    async fn update(&self, admin: &AdminUser) -> Result<AdminUser, AppError>;
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait VerificationRepository: Send + Sync {
    async fn upsert(&self, entry: &EmailVerification) -> Result<(), AppError>;
    async fn find_live(&self, email: &str, not_before: DateTime<Utc>) -> Result<Option<EmailVerification>, AppError>;
    /// Deletes the entry only if `code` matches and it is still live; true when a row went.
    async fn consume(&self, email: &str, code: i64, not_before: DateTime<Utc>) -> Result<bool, AppError>;
    async fn delete_expired(&self, before: DateTime<Utc>) -> Result<u64, AppError>;
}

#[async_trait]
pub trait SupportRepository: Send + Sync {
    async fn create_ticket(&self, ticket: &SupportTicket) -> Result<SupportTicket, AppError>;
    async fn find_ticket(&self, id: &str) -> Result<Option<SupportTicket>, AppError>;
    async fn list_tickets(&self) -> Result<Vec<SupportTicket>, AppError>;
    async fn list_tickets_by_tenant(&self, tenant_id: &str) -> Result<Vec<SupportTicket>, AppError>;
    async fn update_ticket(&self, ticket: &SupportTicket) -> Result<SupportTicket, AppError>;
    async fn delete_ticket(&self, id: &str) -> Result<bool, AppError>;
    async fn add_message(&self, message: &SupportMessage) -> Result<SupportMessage, AppError>;
    async fn list_messages(&self, ticket_id: &str) -> Result<Vec<SupportMessage>, AppError>;
}

#[async_trait]
pub trait OnboardingRunRepository: Send + Sync {
    async fn create(&self, run: &OnboardingRun) -> Result<(), AppError>;
    async fn record(&self, run: &OnboardingRun) -> Result<(), AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<OnboardingRun>, AppError>;
    async fn list_by_email(&self, email: &str) -> Result<Vec<OnboardingRun>, AppError>;
}

#[async_trait]
pub trait BillingService: Send + Sync {
    async fn create_customer(&self, profile: &CustomerProfile) -> Result<String, AppError>;
    async fn create_trial_subscription(&self, customer_id: &str, trial_days: u32) -> Result<TrialSubscription, AppError>;
    async fn create_checkout_session(&self, customer_id: &str, trial_days: u32) -> Result<String, AppError>;
    async fn delete_customer(&self, customer_id: &str) -> Result<(), AppError>;
    fn construct_event(&self, payload: &[u8], signature_header: &str) -> Result<BillingEvent, AppError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForkedRepository {
    pub name: String,
    pub id: i64,
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SecretsPublicKey {
    pub key_id: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryFile {
    pub sha: String,
    pub content: String,
}

#[async_trait]
pub trait ForgeService: Send + Sync {
    async fn fork_repository(&self, template: &str, fork_name: &str) -> Result<ForkedRepository, AppError>;
    async fn secrets_public_key(&self, repo: &str) -> Result<SecretsPublicKey, AppError>;
    async fn put_secret(&self, repo: &str, name: &str, encrypted_value: &str, key_id: &str) -> Result<(), AppError>;
    async fn get_file(&self, repo: &str, path: &str) -> Result<RepositoryFile, AppError>;
    /// Overwrites `path`; rejected when `sha` no longer matches the stored blob.
    async fn update_file(&self, repo: &str, path: &str, message: &str, content: &str, sha: &str) -> Result<(), AppError>;
    /// Creates `path`; rejected when it already exists.
    async fn create_file(&self, repo: &str, path: &str, message: &str, content: &str) -> Result<(), AppError>;
    async fn delete_repository(&self, repo: &str) -> Result<(), AppError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct HostedSite {
    pub id: String,
    pub url: String,
}

#[async_trait]
pub trait SiteHostService: Send + Sync {
    async fn create_site(&self, name: &str) -> Result<HostedSite, AppError>;
    async fn delete_site(&self, site_id: &str) -> Result<(), AppError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRestaurant {
    pub name: String,
    pub description: String,
    pub address: String,
}

#[async_trait]
pub trait RestaurantService: Send + Sync {
    async fn create_restaurant(&self, restaurant: &NewRestaurant) -> Result<String, AppError>;
    async fn delete_restaurant(&self, restaurant_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}
