use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::config::ForgeConfig;
use crate::domain::ports::{ForgeService, ForkedRepository, RepositoryFile, SecretsPublicKey};
use crate::error::AppError;
use crate::infra::http::{connection_error, ensure_success, read_json};

const USER_AGENT: &str = "yourway-backend";

pub struct GitHubForgeService {
    client: Client,
    api_base: String,
    token: String,
    owner: String,
}

#[derive(Deserialize)]
struct ForkResponse {
    id: i64,
    name: String,
    html_url: String,
}

#[derive(Deserialize)]
struct PublicKeyResponse {
    key_id: String,
    key: String,
}

#[derive(Deserialize)]
struct ContentsResponse {
    sha: String,
    content: String,
}

impl GitHubForgeService {
    pub fn new(config: &ForgeConfig) -> Self {
        Self {
            client: Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            owner: config.owner.clone(),
        }
    }

    fn repo_url(&self, repo: &str, path: &str) -> String {
        if path.is_empty() {
            format!("{}/repos/{}/{}", self.api_base, self.owner, repo)
        } else {
            format!("{}/repos/{}/{}/{}", self.api_base, self.owner, repo, path)
        }
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .bearer_auth(&self.token)
    }

    async fn send(&self, builder: RequestBuilder, context: &str) -> Result<reqwest::Response, AppError> {
        let res = self.authorized(builder)
            .send()
            .await
            .map_err(|e| connection_error(context, e))?;
        ensure_success(res, context).await
    }

    async fn put_contents(&self, repo: &str, path: &str, body: serde_json::Value, context: &str) -> Result<(), AppError> {
        let url = self.repo_url(repo, &format!("contents/{}", path));
        self.send(self.client.put(url).json(&body), context).await?;
        Ok(())
    }
}

fn decode_contents(encoded: &str) -> Result<String, AppError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| AppError::Upstream(format!("GitHub returned undecodable file content: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Upstream(format!("GitHub file is not UTF-8: {}", e)))
}

#[async_trait]
impl ForgeService for GitHubForgeService {
    #[instrument(skip(self))]
    async fn fork_repository(&self, template: &str, fork_name: &str) -> Result<ForkedRepository, AppError> {
        let context = "GitHub fork";
        let body = json!({
            "organization": self.owner,
            "name": fork_name,
            "default_branch_only": true,
        });
        let res = self.send(self.client.post(self.repo_url(template, "forks")).json(&body), context).await?;
        let fork: ForkResponse = read_json(res, context).await?;
        info!(repo = %fork.name, repo_id = fork.id, "Repository forked");
        Ok(ForkedRepository { name: fork.name, id: fork.id, html_url: fork.html_url })
    }

    async fn secrets_public_key(&self, repo: &str) -> Result<SecretsPublicKey, AppError> {
        let context = "GitHub secrets public key";
        let res = self.send(self.client.get(self.repo_url(repo, "actions/secrets/public-key")), context).await?;
        let key: PublicKeyResponse = read_json(res, context).await?;
        Ok(SecretsPublicKey { key_id: key.key_id, key: key.key })
    }

    #[instrument(skip(self, encrypted_value))]
    async fn put_secret(&self, repo: &str, name: &str, encrypted_value: &str, key_id: &str) -> Result<(), AppError> {
        let body = json!({ "encrypted_value": encrypted_value, "key_id": key_id });
        let url = self.repo_url(repo, &format!("actions/secrets/{}", name));
        self.send(self.client.put(url).json(&body), "GitHub secret upload").await?;
        Ok(())
    }

    async fn get_file(&self, repo: &str, path: &str) -> Result<RepositoryFile, AppError> {
        let context = "GitHub file read";
        let url = self.repo_url(repo, &format!("contents/{}", path));
        let res = self.send(self.client.get(url), context).await?;
        let file: ContentsResponse = read_json(res, context).await?;
        Ok(RepositoryFile { sha: file.sha, content: decode_contents(&file.content)? })
    }

    #[instrument(skip(self, content))]
    async fn update_file(&self, repo: &str, path: &str, message: &str, content: &str, sha: &str) -> Result<(), AppError> {
        let body = json!({
            "message": message,
            "content": STANDARD.encode(content),
            "sha": sha,
        });
        self.put_contents(repo, path, body, "GitHub file update").await
    }

    #[instrument(skip(self, content))]
    async fn create_file(&self, repo: &str, path: &str, message: &str, content: &str) -> Result<(), AppError> {
        let body = json!({
            "message": message,
            "content": STANDARD.encode(content),
        });
        self.put_contents(repo, path, body, "GitHub file creation").await
    }

    #[instrument(skip(self))]
    async fn delete_repository(&self, repo: &str) -> Result<(), AppError> {
        self.send(self.client.delete(self.repo_url(repo, "")), "GitHub repository deletion").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::decode_contents;

    #[test]
    fn decodes_wrapped_base64_contents() {
        // "export const RestaurantID = \"abc\";\n" split across lines like the API does.
        let wrapped = "ZXhwb3J0IGNvbnN0IFJlc3RhdXJh\nbnRJRCA9ICJhYmMiOwo=\n";
        assert_eq!(decode_contents(wrapped).unwrap(), "export const RestaurantID = \"abc\";\n");
    }

    #[test]
    fn rejects_garbage_contents() {
        assert!(decode_contents("!!not base64!!").is_err());
    }
}
