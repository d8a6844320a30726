pub mod auth_service;
pub mod billing_events;
pub mod onboarding;
pub mod verification_service;
