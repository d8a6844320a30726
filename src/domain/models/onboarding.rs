use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;

use super::tenant::{BusinessAddress, Tenant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnboardingState {
    ValidateUniqueness,
    Bill,
    CreateBackendResource,
    ForkRepo,
    InjectDeploySecret,
    PatchConfig,
    ProvisionSite,
    InstallWorkflows,
    PersistTenant,
    IssueSessionToken,
    Completed,
    Aborted,
}

impl OnboardingState {
    pub const SEQUENCE: [OnboardingState; 11] = [
        OnboardingState::ValidateUniqueness,
        OnboardingState::Bill,
        OnboardingState::CreateBackendResource,
        OnboardingState::ForkRepo,
        OnboardingState::InjectDeploySecret,
        OnboardingState::PatchConfig,
        OnboardingState::ProvisionSite,
        OnboardingState::InstallWorkflows,
        OnboardingState::PersistTenant,
        OnboardingState::IssueSessionToken,
        OnboardingState::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OnboardingState::ValidateUniqueness => "validate-uniqueness",
            OnboardingState::Bill => "bill",
            OnboardingState::CreateBackendResource => "create-backend-resource",
            OnboardingState::ForkRepo => "fork-repo",
            OnboardingState::InjectDeploySecret => "inject-deploy-secret",
            OnboardingState::PatchConfig => "patch-config",
            OnboardingState::ProvisionSite => "provision-site",
            OnboardingState::InstallWorkflows => "install-workflows",
            OnboardingState::PersistTenant => "persist-tenant",
            OnboardingState::IssueSessionToken => "issue-session-token",
            OnboardingState::Completed => "completed",
            OnboardingState::Aborted => "aborted",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::SEQUENCE
            .into_iter()
            .chain([OnboardingState::Aborted])
            .find(|state| state.as_str() == value)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OnboardingState::Completed | OnboardingState::Aborted)
    }
}

impl fmt::Display for OnboardingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedResources {
    pub customer_id: Option<String>,
    pub subscription_id: Option<String>,
    pub restaurant_id: Option<String>,
    pub repo_name: Option<String>,
    pub repo_id: Option<i64>,
    pub site_id: Option<String>,
    pub site_url: Option<String>,
    #[serde(default)]
    pub secrets: Vec<String>,
}

impl ProvisionedResources {
    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none()
            && self.restaurant_id.is_none()
            && self.repo_name.is_none()
            && self.site_id.is_none()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct OnboardingRun {
    pub id: String,
    pub email: String,
    pub state: String,
    pub resources: String,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OnboardingRun {
    pub fn new(email: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            state: OnboardingState::ValidateUniqueness.as_str().to_string(),
            resources: "{}".to_string(),
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn resources(&self) -> ProvisionedResources {
        serde_json::from_str(&self.resources).unwrap_or_default()
    }

    pub fn is_finished(&self) -> bool {
        OnboardingState::parse(&self.state).is_some_and(|state| state.is_terminal())
    }
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub business_name: String,
    pub business_address: BusinessAddress,
}

#[derive(Debug, Clone)]
pub struct OnboardingOutcome {
    pub run_id: String,
    pub tenant: Tenant,
    pub token: String,
    pub client_secret: Option<String>,
}

pub fn build_name(business_name: &str) -> String {
    business_name.split_whitespace().collect::<Vec<_>>().join("-")
}
