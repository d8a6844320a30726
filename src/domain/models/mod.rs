pub mod admin;
pub mod auth;
pub mod billing;
pub mod onboarding;
pub mod support;
pub mod tenant;
pub mod verification;
