use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

pub const CODE_LIFETIME_MINUTES: i64 = 10;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct EmailVerification {
    pub email: String,
    pub verification_code: i64,
    pub created_at: DateTime<Utc>,
}

impl EmailVerification {
    pub fn new(email: String, verification_code: i64) -> Self {
        Self { email, verification_code, created_at: Utc::now() }
    }
}

pub fn expiry_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::minutes(CODE_LIFETIME_MINUTES)
}
