use crate::domain::{models::onboarding::OnboardingRun, ports::OnboardingRunRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteOnboardingRepo {
    pool: SqlitePool,
}

impl SqliteOnboardingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OnboardingRunRepository for SqliteOnboardingRepo {
    async fn create(&self, run: &OnboardingRun) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO onboarding_runs (id, email, state, resources, error, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
            .bind(&run.id)
            .bind(&run.email)
            .bind(&run.state)
            .bind(&run.resources)
            .bind(&run.error)
            .bind(run.created_at)
            .bind(run.updated_at)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn record(&self, run: &OnboardingRun) -> Result<(), AppError> {
        sqlx::query("UPDATE onboarding_runs SET state=?, resources=?, error=?, updated_at=? WHERE id=?")
            .bind(&run.state)
            .bind(&run.resources)
            .bind(&run.error)
            .bind(run.updated_at)
            .bind(&run.id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<OnboardingRun>, AppError> {
        sqlx::query_as::<_, OnboardingRun>("SELECT * FROM onboarding_runs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<OnboardingRun>, AppError> {
        sqlx::query_as::<_, OnboardingRun>("SELECT * FROM onboarding_runs WHERE email = ? ORDER BY created_at DESC")
            .bind(email)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
