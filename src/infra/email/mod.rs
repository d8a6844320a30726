pub mod gmail_service;
pub mod google_oauth;
