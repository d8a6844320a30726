use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::domain::ports::{NewRestaurant, RestaurantService};
use crate::error::AppError;
use crate::infra::http::{connection_error, ensure_success, read_json};

const DEFAULT_THEME: &str = "0";

pub struct HttpRestaurantService {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RestaurantPayload<'a> {
    name: &'a str,
    description: &'a str,
    theme: &'a str,
    address: &'a str,
    banner_images: Vec<String>,
    best_sellers: Vec<String>,
}

#[derive(Deserialize)]
struct CreatedRestaurant {
    #[serde(rename = "_id")]
    id: String,
}

impl HttpRestaurantService {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RestaurantService for HttpRestaurantService {
    #[instrument(skip_all, fields(name = %restaurant.name))]
    async fn create_restaurant(&self, restaurant: &NewRestaurant) -> Result<String, AppError> {
        let context = "Restaurant creation";
        let payload = RestaurantPayload {
            name: &restaurant.name,
            description: &restaurant.description,
            theme: DEFAULT_THEME,
            address: &restaurant.address,
            banner_images: Vec::new(),
            best_sellers: Vec::new(),
        };

        let res = self.client.post(format!("{}/api/restaurant", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| connection_error(context, e))?;
        let res = ensure_success(res, context).await?;
        let created: CreatedRestaurant = read_json(res, context).await?;
        info!(restaurant_id = %created.id, "Restaurant record created");
        Ok(created.id)
    }

    #[instrument(skip(self))]
    async fn delete_restaurant(&self, restaurant_id: &str) -> Result<(), AppError> {
        let context = "Restaurant deletion";
        let res = self.client.delete(format!("{}/api/restaurant/{}", self.base_url, restaurant_id))
            .send()
            .await
            .map_err(|e| connection_error(context, e))?;
        ensure_success(res, context).await?;
        Ok(())
    }
}
