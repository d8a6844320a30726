use tracing::info;

use crate::domain::models::{billing::CustomerProfile, onboarding::ProvisionedResources};
use crate::domain::ports::BillingService;
use crate::error::AppError;

pub fn validate_profile(profile: &CustomerProfile) -> Result<(), AppError> {
    match profile.address.first_missing_field() {
        Some(field) => Err(AppError::Validation(format!("Business address {} is required", field))),
        None => Ok(()),
    }
}

pub async fn provision_billing(
    billing: &dyn BillingService,
    profile: &CustomerProfile,
    trial_days: u32,
    resources: &mut ProvisionedResources,
) -> Result<Option<String>, AppError> {
    let customer_id = billing.create_customer(profile).await?;
    resources.customer_id = Some(customer_id.clone());

    let subscription = billing.create_trial_subscription(&customer_id, trial_days).await?;
    resources.subscription_id = Some(subscription.id.clone());

    info!(customer_id = %customer_id, subscription_id = %subscription.id, "Billing provisioned");
    Ok(subscription.client_secret)
}
