use chrono::Utc;
use tracing::info;

use crate::domain::models::onboarding::ProvisionedResources;
use crate::domain::ports::{ForgeService, HostedSite, SiteHostService};
use crate::error::AppError;

use super::secrets::{inject_secrets, NETLIFY_SITE_ID};

pub fn site_name(repo_name: &str, millis: i64) -> String {
    format!("{}-{}", repo_name.to_lowercase(), millis)
}

pub async fn provision_site(
    sites: &dyn SiteHostService,
    forge: &dyn ForgeService,
    repo: &str,
    resources: &mut ProvisionedResources,
) -> Result<HostedSite, AppError> {
    let name = site_name(repo, Utc::now().timestamp_millis());
    let site = sites.create_site(&name).await?;
    resources.site_id = Some(site.id.clone());
    resources.site_url = Some(site.url.clone());
    info!(site_id = %site.id, url = %site.url, "Hosting site created");

    inject_secrets(forge, repo, &[(NETLIFY_SITE_ID, site.id.as_str())], &mut resources.secrets).await?;
    Ok(site)
}
