use std::sync::Arc;
use crate::domain::ports::{
    AdminRepository, BillingService, EmailService, ForgeService, OnboardingRunRepository,
    RestaurantService, SiteHostService, SupportRepository, TenantRepository, VerificationRepository,
};
use crate::domain::models::billing::TRIAL_PERIOD_DAYS;
use crate::domain::services::{
    auth_service::AuthService,
    billing_events::BillingEventHandler,
    onboarding::{OnboardingService, OnboardingSettings},
    verification_service::VerificationService,
};
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct Repositories {
    pub tenants: Arc<dyn TenantRepository>,
    pub admins: Arc<dyn AdminRepository>,
    pub verifications: Arc<dyn VerificationRepository>,
    pub support: Arc<dyn SupportRepository>,
    pub onboarding_runs: Arc<dyn OnboardingRunRepository>,
}

#[derive(Clone)]
pub struct Providers {
    pub billing: Arc<dyn BillingService>,
    pub forge: Arc<dyn ForgeService>,
    pub sites: Arc<dyn SiteHostService>,
    pub restaurants: Arc<dyn RestaurantService>,
    pub email: Arc<dyn EmailService>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub tenant_repo: Arc<dyn TenantRepository>,
    pub admin_repo: Arc<dyn AdminRepository>,
    pub support_repo: Arc<dyn SupportRepository>,
    pub onboarding_repo: Arc<dyn OnboardingRunRepository>,
    pub auth_service: Arc<AuthService>,
    pub billing_service: Arc<dyn BillingService>,
    pub onboarding: Arc<OnboardingService>,
    pub billing_events: Arc<BillingEventHandler>,
    pub verification: Arc<VerificationService>,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn assemble(config: Config, repos: Repositories, providers: Providers, templates: Arc<Tera>) -> Self {
        let auth_service = Arc::new(AuthService::new(&config));

        let settings = OnboardingSettings {
            template_repo: config.forge.template_repo.clone(),
            app_config_path: config.forge.app_config_path.clone(),
            deploy_token: config.hosting.auth_token.clone(),
            restaurant_api_base_url: config.restaurant_api_base_url.clone(),
            trial_days: TRIAL_PERIOD_DAYS,
        };
        let onboarding = Arc::new(OnboardingService::new(
            repos.tenants.clone(),
            repos.onboarding_runs.clone(),
            providers.billing.clone(),
            providers.forge.clone(),
            providers.sites.clone(),
            providers.restaurants.clone(),
            auth_service.clone(),
            settings,
        ));

        let verification = Arc::new(VerificationService::new(
            repos.verifications.clone(),
            repos.tenants.clone(),
            providers.email.clone(),
            templates.clone(),
        ));

        Self {
            config,
            tenant_repo: repos.tenants.clone(),
            admin_repo: repos.admins,
            support_repo: repos.support,
            onboarding_repo: repos.onboarding_runs,
            auth_service,
            billing_service: providers.billing,
            onboarding,
            billing_events: Arc::new(BillingEventHandler::new(repos.tenants)),
            verification,
            templates,
        }
    }
}
