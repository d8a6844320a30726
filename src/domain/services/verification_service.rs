use std::sync::Arc;
use chrono::Utc;
use rand::Rng;
use tera::{Context, Tera};
use tracing::info;

use crate::domain::models::{
    tenant::normalize_email,
    verification::{expiry_cutoff, EmailVerification},
};
use crate::domain::ports::{EmailService, TenantRepository, VerificationRepository};
use crate::error::AppError;

pub const VERIFICATION_TEMPLATE: &str = "verification.html";

pub struct VerificationService {
    repo: Arc<dyn VerificationRepository>,
    tenants: Arc<dyn TenantRepository>,
    email: Arc<dyn EmailService>,
    templates: Arc<Tera>,
}

impl VerificationService {
    pub fn new(
        repo: Arc<dyn VerificationRepository>,
        tenants: Arc<dyn TenantRepository>,
        email: Arc<dyn EmailService>,
        templates: Arc<Tera>,
    ) -> Self {
        Self { repo, tenants, email, templates }
    }

    pub async fn send_code(&self, email: &str) -> Result<(), AppError> {
        let email = normalize_email(email);
        if self.tenants.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Your Account Already Exists".into()));
        }

        let code = match self.repo.find_live(&email, expiry_cutoff(Utc::now())).await? {
            Some(entry) => entry.verification_code,
            None => {
                let code = rand::thread_rng().gen_range(100_000..=999_999);
                self.repo.upsert(&EmailVerification::new(email.clone(), code)).await?;
                code
            }
        };

        let mut context = Context::new();
        context.insert("code", &code);
        let body = self.templates.render(VERIFICATION_TEMPLATE, &context)
            .map_err(|e| AppError::InternalWithMsg(format!("Template render failed: {}", e)))?;

        let subject = format!("[{}] YourWay Two-Factor Authentication Code", code);
        self.email.send(&email, &subject, &body).await?;

        info!("Verification code sent to {}", email);
        Ok(())
    }

    pub async fn verify_code(&self, email: &str, code: i64) -> Result<bool, AppError> {
        let email = normalize_email(email);
        let accepted = self.repo.consume(&email, code, expiry_cutoff(Utc::now())).await?;
        if accepted {
            info!("Email verified: {}", email);
        }
        Ok(accepted)
    }

    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        self.repo.delete_expired(expiry_cutoff(Utc::now())).await
    }
}
