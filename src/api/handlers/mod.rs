pub mod admin;
pub mod auth;
pub mod billing;
pub mod health;
pub mod onboarding_runs;
pub mod registration;
pub mod support;
pub mod tenant_admin;
pub mod verification;
