use reqwest::Response;
use serde_json::Value;
use tracing::error;

use crate::error::AppError;

/// Passes successful responses through and turns anything else into an
/// [`AppError::Upstream`] carrying the provider's own message.
pub async fn ensure_success(res: Response, context: &str) -> Result<Response, AppError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let text = res.text().await.unwrap_or_default();
    let detail = provider_message(&text).unwrap_or(text);
    let msg = format!("{} failed. Status: {}, Message: {}", context, status, detail);
    error!("{}", msg);
    Err(AppError::Upstream(msg))
}

pub fn connection_error(context: &str, e: reqwest::Error) -> AppError {
    let msg = format!("{} connection error: {}", context, e);
    error!("{}", msg);
    AppError::Upstream(msg)
}

pub async fn read_json<T: serde::de::DeserializeOwned>(res: Response, context: &str) -> Result<T, AppError> {
    res.json::<T>().await.map_err(|e| {
        let msg = format!("{} returned an unexpected body: {}", context, e);
        error!("{}", msg);
        AppError::Upstream(msg)
    })
}

fn provider_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("message")
        .or_else(|| value.get("error").and_then(|e| e.get("message")))
        .or_else(|| value.get("error_description"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}
