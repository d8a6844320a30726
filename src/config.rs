use std::env;

#[derive(Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub price_id: String,
    pub webhook_secret: String,
    pub api_base: String,
}

#[derive(Clone)]
pub struct ForgeConfig {
    pub token: String,
    pub api_base: String,
    pub owner: String,
    pub template_repo: String,
    pub app_config_path: String,
}

#[derive(Clone)]
pub struct HostingConfig {
    pub auth_token: String,
    pub api_base: String,
}

#[derive(Clone)]
pub struct MailConfig {
    pub sender: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub token_url: String,
    pub api_base: String,
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub client_url: String,
    pub jwt_secret_key: String, // Private key (PEM)
    pub jwt_public_key: String, // Public key (PEM)
    pub auth_issuer: String,
    pub bootstrap_admin_email: Option<String>,
    pub bootstrap_admin_password: Option<String>,
    pub app_base_url: String,
    pub restaurant_api_base_url: String,
    pub stripe: StripeConfig,
    pub forge: ForgeConfig,
    pub hosting: HostingConfig,
    pub mail: MailConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "8000".to_string()).parse().expect("PORT must be a number"),
            client_url: env::var("CLIENT_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
            jwt_secret_key: env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set (Ed25519 Private Key)"),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").expect("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://api.yourway.app".to_string()),
            bootstrap_admin_email: env::var("BOOTSTRAP_ADMIN_EMAIL").ok(),
            bootstrap_admin_password: env::var("BOOTSTRAP_ADMIN_PASSWORD").ok(),
            app_base_url: env::var("APP_BASE_URL").expect("APP_BASE_URL must be set"),
            restaurant_api_base_url: env::var("RESTAURANT_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.fastnfresh.app/chai".to_string()),
            stripe: StripeConfig {
                secret_key: env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY must be set"),
                price_id: env::var("STRIPE_PRICE_ID").expect("STRIPE_PRICE_ID must be set"),
                webhook_secret: env::var("STRIPE_WEBHOOK_SECRET").expect("STRIPE_WEBHOOK_SECRET must be set"),
                api_base: env::var("STRIPE_API_BASE").unwrap_or_else(|_| "https://api.stripe.com".to_string()),
            },
            forge: ForgeConfig {
                token: env::var("GITHUB_TOKEN").expect("GITHUB_TOKEN must be set"),
                api_base: env::var("GITHUB_API_BASE").unwrap_or_else(|_| "https://api.github.com".to_string()),
                owner: env::var("GITHUB_OWNER").unwrap_or_else(|_| "YourWayApps".to_string()),
                template_repo: env::var("TEMPLATE_REPO").expect("TEMPLATE_REPO must be set"),
                app_config_path: env::var("APP_CONFIG_PATH").unwrap_or_else(|_| "constants.js".to_string()),
            },
            hosting: HostingConfig {
                auth_token: env::var("NETLIFY_AUTH_TOKEN").expect("NETLIFY_AUTH_TOKEN must be set"),
                api_base: env::var("NETLIFY_API_BASE").unwrap_or_else(|_| "https://api.netlify.com".to_string()),
            },
            mail: MailConfig {
                sender: env::var("GMAIL_SENDER").expect("GMAIL_SENDER must be set"),
                client_id: env::var("GOOGLE_CLIENT_ID").expect("GOOGLE_CLIENT_ID must be set"),
                client_secret: env::var("GOOGLE_CLIENT_SECRET").expect("GOOGLE_CLIENT_SECRET must be set"),
                refresh_token: env::var("GOOGLE_REFRESH_TOKEN").expect("GOOGLE_REFRESH_TOKEN must be set"),
                token_url: env::var("GOOGLE_TOKEN_URL").unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string()),
                api_base: env::var("GMAIL_API_BASE").unwrap_or_else(|_| "https://gmail.googleapis.com".to_string()),
            },
        }
    }
}
