use tracing::info;

use crate::domain::ports::ForgeService;
use crate::error::AppError;

pub const TEARDOWN_WORKFLOW_PATH: &str = ".github/workflows/delete.yml";
pub const DEPLOY_WORKFLOW_PATH: &str = ".github/workflows/deploy.yml";

pub const TEARDOWN_WORKFLOW: &str = include_str!("../../../../templates/workflows/delete.yml");
pub const DEPLOY_WORKFLOW: &str = include_str!("../../../../templates/workflows/deploy.yml");

/// Not idempotent: creation fails when a file already exists.
pub async fn install_workflows(forge: &dyn ForgeService, repo: &str) -> Result<(), AppError> {
    let definitions = [
        (TEARDOWN_WORKFLOW_PATH, TEARDOWN_WORKFLOW, "Delete Netlify site"),
        (DEPLOY_WORKFLOW_PATH, DEPLOY_WORKFLOW, "Deploy to Netlify"),
    ];

    for (path, content, message) in definitions {
        forge.create_file(repo, path, message, content).await.map_err(|e| match e {
            AppError::Upstream(msg) => AppError::Upstream(format!("Error creating workflow '{}': {}", path, msg)),
            other => other,
        })?;
        info!(repo = %repo, path = %path, "Installed workflow");
    }
    Ok(())
}
