use serde::Deserialize;
use serde_json::Value;

use super::tenant::BusinessAddress;

pub const TRIAL_PERIOD_DAYS: u32 = 3;

#[derive(Debug, Clone)]
pub struct CustomerProfile {
    pub email: String,
    pub name: String,
    pub phone: String,
    pub address: BusinessAddress,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrialSubscription {
    pub id: String,
    pub client_secret: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BillingEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: BillingEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BillingEventData {
    pub object: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionObject {
    pub id: String,
    pub status: String,
    pub current_period_start: Option<i64>,
    pub current_period_end: Option<i64>,
    #[serde(default)]
    pub items: Option<SubscriptionItems>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionItems {
    #[serde(default)]
    pub data: Vec<SubscriptionItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionItem {
    pub current_period_start: Option<i64>,
    pub current_period_end: Option<i64>,
}

impl SubscriptionObject {
    pub fn period(&self) -> (Option<i64>, Option<i64>) {
        let first_item = self.items.as_ref().and_then(|items| items.data.first());
        (
            self.current_period_start.or_else(|| first_item.and_then(|i| i.current_period_start)),
            self.current_period_end.or_else(|| first_item.and_then(|i| i.current_period_end)),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceObject {
    pub id: String,
    pub customer: Option<String>,
}
