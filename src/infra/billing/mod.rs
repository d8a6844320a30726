pub mod signature;
pub mod stripe_service;
