use serde::{Deserialize, Serialize};

pub const ROLE_TENANT: &str = "tenant";
pub const SESSION_AUDIENCE: &str = "yourway-dashboard";
pub const SESSION_COOKIE: &str = "token";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
    pub role: String,
}
