use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::config::StripeConfig;
use crate::domain::models::billing::{BillingEvent, CustomerProfile, TrialSubscription};
use crate::domain::ports::BillingService;
use crate::error::AppError;
use crate::infra::http::{connection_error, ensure_success, read_json};

use super::signature::construct_event;

pub struct StripeService {
    client: Client,
    config: StripeConfig,
    app_base_url: String,
}

#[derive(Deserialize)]
struct StripeObject {
    id: String,
}

#[derive(Deserialize)]
struct SubscriptionResponse {
    id: String,
    latest_invoice: Option<InvoiceResponse>,
}

#[derive(Deserialize)]
struct InvoiceResponse {
    payment_intent: Option<PaymentIntentResponse>,
}

#[derive(Deserialize)]
struct PaymentIntentResponse {
    client_secret: Option<String>,
}

#[derive(Deserialize)]
struct CheckoutSessionResponse {
    url: Option<String>,
}

impl StripeService {
    pub fn new(config: StripeConfig, app_base_url: String) -> Self {
        Self { client: Client::new(), config, app_base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.config.api_base.trim_end_matches('/'), path)
    }

    async fn post_form(&self, path: &str, form: &[(&str, String)], context: &str) -> Result<reqwest::Response, AppError> {
        let res = self.client.post(self.url(path))
            .bearer_auth(&self.config.secret_key)
            .form(form)
            .send()
            .await
            .map_err(|e| connection_error(context, e))?;
        ensure_success(res, context).await
    }
}

#[async_trait]
impl BillingService for StripeService {
    #[instrument(skip_all)]
    async fn create_customer(&self, profile: &CustomerProfile) -> Result<String, AppError> {
        let form = [
            ("email", profile.email.clone()),
            ("name", profile.name.clone()),
            ("phone", profile.phone.clone()),
            ("address[line1]", profile.address.street.clone()),
            ("address[city]", profile.address.city.clone()),
            ("address[state]", profile.address.state.clone()),
            ("address[postal_code]", profile.address.zip_code.clone()),
            ("address[country]", profile.address.country.clone()),
        ];
        let res = self.post_form("customers", &form, "Stripe customer creation").await?;
        let customer: StripeObject = read_json(res, "Stripe customer creation").await?;
        info!(customer_id = %customer.id, "Stripe customer created");
        Ok(customer.id)
    }

    #[instrument(skip(self))]
    async fn create_trial_subscription(&self, customer_id: &str, trial_days: u32) -> Result<TrialSubscription, AppError> {
        let form = [
            ("customer", customer_id.to_string()),
            ("items[0][price]", self.config.price_id.clone()),
            ("trial_period_days", trial_days.to_string()),
            ("payment_behavior", "default_incomplete".to_string()),
            ("trial_settings[end_behavior][missing_payment_method]", "pause".to_string()),
            ("expand[]", "latest_invoice.payment_intent".to_string()),
        ];
        let res = self.post_form("subscriptions", &form, "Stripe subscription creation").await?;
        let subscription: SubscriptionResponse = read_json(res, "Stripe subscription creation").await?;

        let client_secret = subscription.latest_invoice
            .and_then(|invoice| invoice.payment_intent)
            .and_then(|intent| intent.client_secret);
        Ok(TrialSubscription { id: subscription.id, client_secret })
    }

    #[instrument(skip(self))]
    async fn create_checkout_session(&self, customer_id: &str, trial_days: u32) -> Result<String, AppError> {
        let base = self.app_base_url.trim_end_matches('/');
        let mut form = vec![
            ("customer", customer_id.to_string()),
            ("mode", "subscription".to_string()),
            ("payment_method_types[0]", "card".to_string()),
            ("line_items[0][price]", self.config.price_id.clone()),
            ("line_items[0][quantity]", "1".to_string()),
            ("success_url", format!("{}/success?session_id={{CHECKOUT_SESSION_ID}}", base)),
            ("cancel_url", format!("{}/cancel", base)),
            ("subscription_data[trial_settings][end_behavior][missing_payment_method]", "pause".to_string()),
        ];
        // Stripe rejects a zero-day trial, so paid plans omit the field entirely.
        if trial_days > 0 {
            form.push(("subscription_data[trial_period_days]", trial_days.to_string()));
        }

        let res = self.post_form("checkout/sessions", &form, "Stripe checkout session").await?;
        let session: CheckoutSessionResponse = read_json(res, "Stripe checkout session").await?;
        session.url.ok_or_else(|| AppError::Upstream("Stripe checkout session has no url".into()))
    }

    #[instrument(skip(self))]
    async fn delete_customer(&self, customer_id: &str) -> Result<(), AppError> {
        let context = "Stripe customer deletion";
        let res = self.client.delete(self.url(&format!("customers/{}", customer_id)))
            .bearer_auth(&self.config.secret_key)
            .send()
            .await
            .map_err(|e| connection_error(context, e))?;
        ensure_success(res, context).await?;
        Ok(())
    }

    fn construct_event(&self, payload: &[u8], signature_header: &str) -> Result<BillingEvent, AppError> {
        construct_event(&self.config.webhook_secret, payload, signature_header, Utc::now().timestamp())
    }
}
