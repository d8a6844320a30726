pub mod sqlite_admin_repo;
pub mod sqlite_onboarding_repo;
pub mod sqlite_support_repo;
pub mod sqlite_tenant_repo;
pub mod sqlite_verification_repo;

pub mod postgres_admin_repo;
pub mod postgres_onboarding_repo;
pub mod postgres_support_repo;
pub mod postgres_tenant_repo;
pub mod postgres_verification_repo;
