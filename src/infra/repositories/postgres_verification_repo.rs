use crate::domain::{models::verification::EmailVerification, ports::VerificationRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresVerificationRepo {
    pool: PgPool,
}

impl PostgresVerificationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationRepository for PostgresVerificationRepo {
    async fn upsert(&self, entry: &EmailVerification) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO email_verifications (email, verification_code, created_at) VALUES ($1, $2, $3) \
             ON CONFLICT (email) DO UPDATE SET verification_code = excluded.verification_code, created_at = excluded.created_at"
        )
            .bind(&entry.email)
            .bind(entry.verification_code)
            .bind(entry.created_at)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn find_live(&self, email: &str, not_before: DateTime<Utc>) -> Result<Option<EmailVerification>, AppError> {
        sqlx::query_as::<_, EmailVerification>(
            "SELECT email, verification_code, created_at FROM email_verifications WHERE email = $1 AND created_at >= $2"
        )
            .bind(email)
            .bind(not_before)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn consume(&self, email: &str, code: i64, not_before: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM email_verifications WHERE email = $1 AND verification_code = $2 AND created_at >= $3"
        )
            .bind(email)
            .bind(code)
            .bind(not_before)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete_expired(&self, before: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM email_verifications WHERE created_at < $1")
            .bind(before)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
