use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl BusinessAddress {
    pub fn first_missing_field(&self) -> Option<&'static str> {
        [
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("zipCode", &self.zip_code),
            ("country", &self.country),
        ]
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
    }

    pub fn one_line(&self) -> String {
        format!("{}, {}, {}, {}, {}", self.street, self.city, self.state, self.zip_code, self.country)
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub phone: String,
    pub business_name: String,
    #[sqlx(flatten)]
    pub business_address: BusinessAddress,
    pub subscription_plan: Option<String>,
    pub subscription_start_date: Option<DateTime<Utc>>,
    pub subscription_end_date: Option<DateTime<Utc>>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub is_active: bool,
    pub repo_link: String,
    pub build_url: String,
    #[serde(rename = "restaurantID")]
    pub restaurant_id: Option<String>,
    #[serde(rename = "siteID")]
    pub site_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        phone: String,
        business_name: String,
        business_address: BusinessAddress,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email: normalize_email(&email),
            password_hash,
            phone,
            business_name,
            business_address,
            subscription_plan: None,
            subscription_start_date: None,
            subscription_end_date: None,
            stripe_customer_id: None,
            stripe_subscription_id: None,
            is_active: true,
            repo_link: String::new(),
            build_url: String::new(),
            restaurant_id: None,
            site_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionUpdate {
    pub plan: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
