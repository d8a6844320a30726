use async_trait::async_trait;
use base64::{engine::general_purpose::{STANDARD, URL_SAFE}, Engine as _};
use reqwest::Client;
use serde_json::json;
use tracing::{info, instrument};

use crate::config::MailConfig;
use crate::domain::ports::EmailService;
use crate::error::AppError;
use crate::infra::http::{connection_error, ensure_success};

use super::google_oauth::GoogleOAuthClient;

pub struct GmailEmailService {
    client: Client,
    api_base: String,
    sender: String,
    oauth: GoogleOAuthClient,
}

impl GmailEmailService {
    pub fn new(config: &MailConfig) -> Self {
        let client = Client::new();
        Self {
            oauth: GoogleOAuthClient::new(client.clone(), config),
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            sender: config.sender.clone(),
        }
    }
}

fn header_value(value: &str) -> String {
    value.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}

fn encode_subject(subject: &str) -> String {
    let subject = header_value(subject);
    if subject.is_ascii() {
        subject
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(subject))
    }
}

pub fn build_message(sender: &str, recipient: &str, subject: &str, html_body: &str) -> String {
    format!(
        "From: {}\r\nTo: {}\r\nSubject: {}\r\nMIME-Version: 1.0\r\nContent-Type: text/html; charset=\"UTF-8\"\r\nContent-Transfer-Encoding: base64\r\n\r\n{}",
        header_value(sender),
        header_value(recipient),
        encode_subject(subject),
        STANDARD.encode(html_body),
    )
}

#[async_trait]
impl EmailService for GmailEmailService {
    #[instrument(skip(self, html_body))]
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
        let context = "Gmail send";
        let access_token = self.oauth.access_token().await?;
        let raw = URL_SAFE.encode(build_message(&self.sender, recipient, subject, html_body));

        let res = self.client.post(format!("{}/gmail/v1/users/me/messages/send", self.api_base))
            .bearer_auth(access_token)
            .json(&json!({ "raw": raw }))
            .send()
            .await
            .map_err(|e| connection_error(context, e))?;
        ensure_success(res, context).await?;

        info!("Email sent");
        Ok(())
    }
}
