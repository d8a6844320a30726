use std::sync::Arc;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::domain::models::{
    billing::{BillingEvent, InvoiceObject, SubscriptionObject},
    tenant::SubscriptionUpdate,
};
use crate::domain::ports::TenantRepository;
use crate::error::AppError;

pub const CANCELED_PLAN: &str = "canceled";

#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    SubscriptionUpdated { tenant_id: String },
    SubscriptionCanceled { tenant_id: String },
    PaymentFailed { tenant_id: String },
    UnknownTenant,
    Malformed,
    Ignored,
}

pub struct BillingEventHandler {
    tenants: Arc<dyn TenantRepository>,
}

impl BillingEventHandler {
    pub fn new(tenants: Arc<dyn TenantRepository>) -> Self {
        Self { tenants }
    }

    pub async fn handle(&self, event: &BillingEvent) -> Result<EventOutcome, AppError> {
        match event.event_type.as_str() {
            "customer.subscription.updated" | "customer.subscription.created" => {
                let Some(subscription) = parse_object::<SubscriptionObject>(event) else {
                    return Ok(EventOutcome::Malformed);
                };
                let Some(tenant) = self.tenants.find_by_subscription_id(&subscription.id).await? else {
                    return Ok(EventOutcome::UnknownTenant);
                };

                let update = subscription_update(&subscription);
                self.tenants.apply_subscription_update(&tenant.id, &update).await?;
                info!(tenant_id = %tenant.id, plan = %update.plan, "Subscription synced from billing event");
                Ok(EventOutcome::SubscriptionUpdated { tenant_id: tenant.id })
            }
            "customer.subscription.deleted" => {
                let Some(subscription) = parse_object::<SubscriptionObject>(event) else {
                    return Ok(EventOutcome::Malformed);
                };
                let Some(tenant) = self.tenants.find_by_subscription_id(&subscription.id).await? else {
                    return Ok(EventOutcome::UnknownTenant);
                };

                let update = SubscriptionUpdate {
                    plan: CANCELED_PLAN.to_string(),
                    start_date: tenant.subscription_start_date,
                    end_date: tenant.subscription_end_date,
                    is_active: false,
                };
                self.tenants.apply_subscription_update(&tenant.id, &update).await?;
                info!(tenant_id = %tenant.id, "Subscription canceled");
                Ok(EventOutcome::SubscriptionCanceled { tenant_id: tenant.id })
            }
            "invoice.payment_failed" => {
                let Some(invoice) = parse_object::<InvoiceObject>(event) else {
                    return Ok(EventOutcome::Malformed);
                };
                let tenant = match &invoice.customer {
                    Some(customer_id) => self.tenants.find_by_customer_id(customer_id).await?,
                    None => None,
                };
                match tenant {
                    Some(tenant) => {
                        warn!(tenant_id = %tenant.id, invoice_id = %invoice.id, "Payment failed for user {}", tenant.email);
                        Ok(EventOutcome::PaymentFailed { tenant_id: tenant.id })
                    }
                    None => Ok(EventOutcome::UnknownTenant),
                }
            }
            other => {
                info!(event_id = %event.id, "Unhandled event type {}", other);
                Ok(EventOutcome::Ignored)
            }
        }
    }
}

fn parse_object<T: DeserializeOwned>(event: &BillingEvent) -> Option<T> {
    match serde_json::from_value(event.data.object.clone()) {
        Ok(object) => Some(object),
        Err(e) => {
            warn!(event_id = %event.id, "Malformed {} payload: {}", event.event_type, e);
            None
        }
    }
}

pub fn subscription_update(subscription: &SubscriptionObject) -> SubscriptionUpdate {
    let (start, end) = subscription.period();
    let status = subscription.status.as_str();
    SubscriptionUpdate {
        plan: status.to_string(),
        start_date: start.and_then(from_unix),
        end_date: end.and_then(from_unix),
        is_active: status == "active" || status == "trialing",
    }
}

fn from_unix(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
}
