use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::config::HostingConfig;
use crate::domain::ports::{HostedSite, SiteHostService};
use crate::error::AppError;
use crate::infra::http::{connection_error, ensure_success, read_json};

pub struct NetlifySiteService {
    client: Client,
    api_base: String,
    auth_token: String,
}

#[derive(Deserialize)]
struct SiteResponse {
    id: String,
    url: String,
}

impl NetlifySiteService {
    pub fn new(config: &HostingConfig) -> Self {
        Self {
            client: Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        }
    }
}

#[async_trait]
impl SiteHostService for NetlifySiteService {
    #[instrument(skip(self))]
    async fn create_site(&self, name: &str) -> Result<HostedSite, AppError> {
        let context = "Netlify site creation";
        let res = self.client.post(format!("{}/api/v1/sites", self.api_base))
            .bearer_auth(&self.auth_token)
            .json(&json!({ "name": name }))
            .send()
            .await
            .map_err(|e| connection_error(context, e))?;
        let res = ensure_success(res, context).await?;
        let site: SiteResponse = read_json(res, context).await?;
        Ok(HostedSite { id: site.id, url: site.url })
    }

    #[instrument(skip(self))]
    async fn delete_site(&self, site_id: &str) -> Result<(), AppError> {
        let context = "Netlify site deletion";
        let res = self.client.delete(format!("{}/api/v1/sites/{}", self.api_base, site_id))
            .bearer_auth(&self.auth_token)
            .send()
            .await
            .map_err(|e| connection_error(context, e))?;
        ensure_success(res, context).await?;
        Ok(())
    }
}
