use crate::domain::{models::verification::EmailVerification, ports::VerificationRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteVerificationRepo {
    pool: SqlitePool,
}

impl SqliteVerificationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationRepository for SqliteVerificationRepo {
    async fn upsert(&self, entry: &EmailVerification) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO email_verifications (email, verification_code, created_at) VALUES (?, ?, ?) \
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
            "SELECT email, verification_code, created_at FROM email_verifications WHERE email = ? AND created_at >= ?"
        )
            .bind(email)
            .bind(not_before)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn consume(&self, email: &str, code: i64, not_before: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM email_verifications WHERE email = ? AND verification_code = ? AND created_at >= ?"
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
        let result = sqlx::query("DELETE FROM email_verifications WHERE created_at < ?")
            .bind(before)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
