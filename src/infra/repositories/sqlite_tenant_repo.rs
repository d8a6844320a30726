use crate::domain::{models::tenant::{SubscriptionUpdate, Tenant}, ports::TenantRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteTenantRepo {
    pool: SqlitePool,
}

impl SqliteTenantRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_by_column(&self, column: &str, value: &str) -> Result<Option<Tenant>, AppError> {
        sqlx::query_as::<_, Tenant>(&format!("SELECT * FROM tenants WHERE {} = ?", column))
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}

#[async_trait]
impl TenantRepository for SqliteTenantRepo {
    async fn create(&self, tenant: &Tenant) -> Result<Tenant, AppError> {
        sqlx::query_as::<_, Tenant>(
            "INSERT INTO tenants (id, name, email, password_hash, phone, business_name, street, city, state, zip_code, country, \
             subscription_plan, subscription_start_date, subscription_end_date, stripe_customer_id, stripe_subscription_id, \
             is_active, repo_link, build_url, restaurant_id, site_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&tenant.id)
            .bind(&tenant.name)
            .bind(&tenant.email)
            .bind(&tenant.password_hash)
            .bind(&tenant.phone)
            .bind(&tenant.business_name)
            .bind(&tenant.business_address.street)
            .bind(&tenant.business_address.city)
            .bind(&tenant.business_address.state)
            .bind(&tenant.business_address.zip_code)
            .bind(&tenant.business_address.country)
            .bind(&tenant.subscription_plan)
            .bind(tenant.subscription_start_date)
            .bind(tenant.subscription_end_date)
            .bind(&tenant.stripe_customer_id)
            .bind(&tenant.stripe_subscription_id)
            .bind(tenant.is_active)
            .bind(&tenant.repo_link)
            .bind(&tenant.build_url)
            .bind(&tenant.restaurant_id)
            .bind(&tenant.site_id)
            .bind(tenant.created_at)
            .bind(tenant.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Tenant>, AppError> {
        self.find_by_column("id", id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Tenant>, AppError> {
        self.find_by_column("email", email).await
    }

    async fn find_by_subscription_id(&self, subscription_id: &str) -> Result<Option<Tenant>, AppError> {
        self.find_by_column("stripe_subscription_id", subscription_id).await
    }

    async fn find_by_customer_id(&self, customer_id: &str) -> Result<Option<Tenant>, AppError> {
        self.find_by_column("stripe_customer_id", customer_id).await
    }

    async fn list_by_active(&self, is_active: bool) -> Result<Vec<Tenant>, AppError> {
        sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE is_active = ? ORDER BY created_at ASC")
            .bind(is_active)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, tenant: &Tenant) -> Result<Tenant, AppError> {
        sqlx::query_as::<_, Tenant>(
            "UPDATE tenants SET name=?, email=?, phone=?, business_name=?, street=?, city=?, state=?, zip_code=?, country=?, \
             subscription_plan=?, updated_at=? WHERE id=? RETURNING *"
        )
            .bind(&tenant.name)
            .bind(&tenant.email)
            .bind(&tenant.phone)
            .bind(&tenant.business_name)
            .bind(&tenant.business_address.street)
            .bind(&tenant.business_address.city)
            .bind(&tenant.business_address.state)
            .bind(&tenant.business_address.zip_code)
            .bind(&tenant.business_address.country)
            .bind(&tenant.subscription_plan)
            .bind(Utc::now())
            .bind(&tenant.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn apply_subscription_update(&self, id: &str, update: &SubscriptionUpdate) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE tenants SET subscription_plan=?, subscription_start_date=COALESCE(?, subscription_start_date), subscription_end_date=COALESCE(?, subscription_end_date), is_active=?, updated_at=? WHERE id=?"
        )
            .bind(&update.plan)
            .bind(update.start_date)
            .bind(update.end_date)
            .bind(update.is_active)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn set_active(&self, id: &str, is_active: bool) -> Result<Option<Tenant>, AppError> {
        sqlx::query_as::<_, Tenant>("UPDATE tenants SET is_active=?, updated_at=? WHERE id=? RETURNING *")
            .bind(is_active)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tenants WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
