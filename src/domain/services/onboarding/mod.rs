pub mod billing;
pub mod config_patch;
pub mod secrets;
pub mod site;
pub mod workflows;

use std::sync::Arc;
use chrono::{Duration, Utc};
use tracing::{error, info, instrument, warn};

use crate::domain::models::{
    auth::ROLE_TENANT,
    billing::CustomerProfile,
    onboarding::{
        build_name, OnboardingOutcome, OnboardingRun, OnboardingState, ProvisionedResources, Registration,
    },
    tenant::Tenant,
};
use crate::domain::ports::{
    BillingService, ForgeService, NewRestaurant, OnboardingRunRepository, RestaurantService, SiteHostService,
    TenantRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::error::AppError;

pub const TRIAL_PLAN: &str = "trial";

#[derive(Clone, Debug)]
pub struct OnboardingSettings {
    pub template_repo: String,
    pub app_config_path: String,
    pub deploy_token: String,
    pub restaurant_api_base_url: String,
    pub trial_days: u32,
}

pub struct OnboardingService {
    tenants: Arc<dyn TenantRepository>,
    runs: Arc<dyn OnboardingRunRepository>,
    billing: Arc<dyn BillingService>,
    forge: Arc<dyn ForgeService>,
    sites: Arc<dyn SiteHostService>,
    restaurants: Arc<dyn RestaurantService>,
    auth: Arc<AuthService>,
    settings: OnboardingSettings,
}

struct Provisioned {
    tenant: Tenant,
    client_secret: Option<String>,
}

impl OnboardingService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenants: Arc<dyn TenantRepository>,
        runs: Arc<dyn OnboardingRunRepository>,
        billing: Arc<dyn BillingService>,
        forge: Arc<dyn ForgeService>,
        sites: Arc<dyn SiteHostService>,
        restaurants: Arc<dyn RestaurantService>,
        auth: Arc<AuthService>,
        settings: OnboardingSettings,
    ) -> Self {
        Self { tenants, runs, billing, forge, sites, restaurants, auth, settings }
    }

    #[instrument(skip_all, fields(email = %registration.email))]
    pub async fn register(&self, registration: Registration) -> Result<OnboardingOutcome, AppError> {
        let mut run = OnboardingRun::new(registration.email.clone());
        self.runs.create(&run).await?;
        info!(run_id = %run.id, "Onboarding started");

        let mut resources = ProvisionedResources::default();
        let provisioned = match self.provision(&mut run, &registration, &mut resources).await {
            Ok(provisioned) => provisioned,
            Err(e) => {
                error!(run_id = %run.id, state = %run.state, "Onboarding failed: {}", e);
                let leftovers = self.compensate(&resources).await;
                self.finish(&mut run, OnboardingState::Aborted, &leftovers, Some(e.to_string())).await;
                return Err(e);
            }
        };

        // The tenant row now owns the resources, so nothing is released past this point.
        self.advance(&mut run, OnboardingState::IssueSessionToken, &resources).await?;
        let token = match self.auth.issue_token(&provisioned.tenant.id, ROLE_TENANT) {
            Ok(token) => token,
            Err(e) => {
                self.finish(&mut run, OnboardingState::Aborted, &resources, Some(e.to_string())).await;
                return Err(e);
            }
        };

        self.finish(&mut run, OnboardingState::Completed, &resources, None).await;
        info!(run_id = %run.id, tenant_id = %provisioned.tenant.id, "Onboarding completed");

        Ok(OnboardingOutcome {
            run_id: run.id,
            tenant: provisioned.tenant,
            token,
            client_secret: provisioned.client_secret,
        })
    }

    async fn provision(
        &self,
        run: &mut OnboardingRun,
        registration: &Registration,
        resources: &mut ProvisionedResources,
    ) -> Result<Provisioned, AppError> {
        let profile = CustomerProfile {
            email: registration.email.clone(),
            name: registration.name.clone(),
            phone: registration.phone.clone(),
            address: registration.business_address.clone(),
        };

        self.advance(run, OnboardingState::ValidateUniqueness, resources).await?;
        if self.tenants.find_by_email(&registration.email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".into()));
        }
        billing::validate_profile(&profile)?;

        self.advance(run, OnboardingState::Bill, resources).await?;
        let client_secret =
            billing::provision_billing(self.billing.as_ref(), &profile, self.settings.trial_days, resources).await?;

        self.advance(run, OnboardingState::CreateBackendResource, resources).await?;
        let restaurant = NewRestaurant {
            name: registration.business_name.clone(),
            description: registration.business_name.clone(),
            address: registration.business_address.one_line(),
        };
        let restaurant_id = self.restaurants.create_restaurant(&restaurant).await?;
        resources.restaurant_id = Some(restaurant_id.clone());

        self.advance(run, OnboardingState::ForkRepo, resources).await?;
        let fork_name = format!("{}-{}", self.settings.template_repo, build_name(&registration.business_name));
        let fork = self.forge.fork_repository(&self.settings.template_repo, &fork_name).await?;
        resources.repo_name = Some(fork.name.clone());
        resources.repo_id = Some(fork.id);

        self.advance(run, OnboardingState::InjectDeploySecret, resources).await?;
        secrets::inject_secrets(
            self.forge.as_ref(),
            &fork.name,
            &[(secrets::NETLIFY_AUTH_TOKEN, self.settings.deploy_token.as_str())],
            &mut resources.secrets,
        )
        .await?;

        self.advance(run, OnboardingState::PatchConfig, resources).await?;
        config_patch::patch_app_config(
            self.forge.as_ref(),
            &fork.name,
            &self.settings.app_config_path,
            &restaurant_id,
            &self.settings.restaurant_api_base_url,
        )
        .await?;

        self.advance(run, OnboardingState::ProvisionSite, resources).await?;
        let hosted = site::provision_site(self.sites.as_ref(), self.forge.as_ref(), &fork.name, resources).await?;

        self.advance(run, OnboardingState::InstallWorkflows, resources).await?;
        workflows::install_workflows(self.forge.as_ref(), &fork.name).await?;

        self.advance(run, OnboardingState::PersistTenant, resources).await?;
        let now = Utc::now();
        let mut tenant = Tenant::new(
            registration.name.clone(),
            registration.email.clone(),
            registration.password_hash.clone(),
            registration.phone.clone(),
            registration.business_name.clone(),
            registration.business_address.clone(),
        );
        tenant.subscription_plan = Some(TRIAL_PLAN.to_string());
        tenant.subscription_start_date = Some(now);
        tenant.subscription_end_date = Some(now + Duration::days(self.settings.trial_days as i64));
        tenant.stripe_customer_id = resources.customer_id.clone();
        tenant.stripe_subscription_id = resources.subscription_id.clone();
        tenant.repo_link = fork.html_url.clone();
        tenant.build_url = hosted.url.clone();
        tenant.site_id = Some(hosted.id.clone());
        tenant.restaurant_id = Some(restaurant_id);

        let tenant = self.tenants.create(&tenant).await?;
        Ok(Provisioned { tenant, client_secret })
    }

    /// Releases resources newest first. Returns the ones that could not be released.
    async fn compensate(&self, resources: &ProvisionedResources) -> ProvisionedResources {
        let mut leftovers = ProvisionedResources::default();
        if resources.is_empty() {
            return leftovers;
        }

        if let Some(site_id) = &resources.site_id {
            match self.sites.delete_site(site_id).await {
                Ok(()) => info!(site_id = %site_id, "Released hosting site"),
                Err(e) => {
                    warn!(site_id = %site_id, "Failed to release hosting site: {}", e);
                    leftovers.site_id = Some(site_id.clone());
                    leftovers.site_url = resources.site_url.clone();
                }
            }
        }

        if let Some(repo) = &resources.repo_name {
            // Secrets and workflow files go away with the repository.
            match self.forge.delete_repository(repo).await {
                Ok(()) => info!(repo = %repo, "Released forked repository"),
                Err(e) => {
                    warn!(repo = %repo, "Failed to release forked repository: {}", e);
                    leftovers.repo_name = Some(repo.clone());
                    leftovers.repo_id = resources.repo_id;
                    leftovers.secrets = resources.secrets.clone();
                }
            }
        }

        if let Some(restaurant_id) = &resources.restaurant_id {
            match self.restaurants.delete_restaurant(restaurant_id).await {
                Ok(()) => info!(restaurant_id = %restaurant_id, "Released restaurant record"),
                Err(e) => {
                    warn!(restaurant_id = %restaurant_id, "Failed to release restaurant record: {}", e);
                    leftovers.restaurant_id = Some(restaurant_id.clone());
                }
            }
        }

        if let Some(customer_id) = &resources.customer_id {
            // Deleting the customer also cancels its subscriptions.
            match self.billing.delete_customer(customer_id).await {
                Ok(()) => info!(customer_id = %customer_id, "Released billing customer"),
                Err(e) => {
                    warn!(customer_id = %customer_id, "Failed to release billing customer: {}", e);
                    leftovers.customer_id = Some(customer_id.clone());
                    leftovers.subscription_id = resources.subscription_id.clone();
                }
            }
        }

        leftovers
    }

    async fn advance(
        &self,
        run: &mut OnboardingRun,
        state: OnboardingState,
        resources: &ProvisionedResources,
    ) -> Result<(), AppError> {
        run.state = state.as_str().to_string();
        run.resources = serde_json::to_string(resources)
            .map_err(|e| AppError::InternalWithMsg(format!("Failed to encode resources: {}", e)))?;
        run.updated_at = Utc::now();
        self.runs.record(run).await?;
        info!(run_id = %run.id, state = %state, "Onboarding step");
        Ok(())
    }

    async fn finish(
        &self,
        run: &mut OnboardingRun,
        state: OnboardingState,
        resources: &ProvisionedResources,
        error_message: Option<String>,
    ) {
        run.error = error_message;
        if let Err(e) = self.advance(run, state, resources).await {
            error!(run_id = %run.id, "Failed to record terminal onboarding state {}: {}", state, e);
        }
    }
}
