use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::{info, warn};
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::domain::models::admin::{AdminUser, ROLE_SUPER_ADMIN};
use crate::domain::ports::AdminRepository;
use crate::domain::services::auth_service::hash_password;
use crate::domain::services::verification_service::VERIFICATION_TEMPLATE;
use crate::error::AppError;
use crate::state::{AppState, Providers, Repositories};
use crate::infra::billing::stripe_service::StripeService;
use crate::infra::email::gmail_service::GmailEmailService;
use crate::infra::forge::github_service::GitHubForgeService;
use crate::infra::hosting::netlify_service::NetlifySiteService;
use crate::infra::restaurant::http_restaurant_service::HttpRestaurantService;
use crate::infra::repositories::{
    postgres_admin_repo::PostgresAdminRepo, postgres_onboarding_repo::PostgresOnboardingRepo,
    postgres_support_repo::PostgresSupportRepo, postgres_tenant_repo::PostgresTenantRepo,
    postgres_verification_repo::PostgresVerificationRepo,
    sqlite_admin_repo::SqliteAdminRepo, sqlite_onboarding_repo::SqliteOnboardingRepo,
    sqlite_support_repo::SqliteSupportRepo, sqlite_tenant_repo::SqliteTenantRepo,
    sqlite_verification_repo::SqliteVerificationRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let providers = Providers {
        billing: Arc::new(StripeService::new(config.stripe.clone(), config.app_base_url.clone())),
        forge: Arc::new(GitHubForgeService::new(&config.forge)),
        sites: Arc::new(NetlifySiteService::new(&config.hosting)),
        restaurants: Arc::new(HttpRestaurantService::new(config.app_base_url.clone())),
        email: Arc::new(GmailEmailService::new(&config.mail)),
    };

    let mut tera = Tera::default();
    tera.add_raw_template(VERIFICATION_TEMPLATE, include_str!("../../templates/verification.html"))
        .expect("Failed to load verification template");
    let templates = Arc::new(tera);

    let repos = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        Repositories {
            tenants: Arc::new(PostgresTenantRepo::new(pool.clone())),
            admins: Arc::new(PostgresAdminRepo::new(pool.clone())),
            verifications: Arc::new(PostgresVerificationRepo::new(pool.clone())),
            support: Arc::new(PostgresSupportRepo::new(pool.clone())),
            onboarding_runs: Arc::new(PostgresOnboardingRepo::new(pool)),
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        Repositories {
            tenants: Arc::new(SqliteTenantRepo::new(pool.clone())),
            admins: Arc::new(SqliteAdminRepo::new(pool.clone())),
            verifications: Arc::new(SqliteVerificationRepo::new(pool.clone())),
            support: Arc::new(SqliteSupportRepo::new(pool.clone())),
            onboarding_runs: Arc::new(SqliteOnboardingRepo::new(pool)),
        }
    };

    if let Err(e) = seed_super_admin(repos.admins.as_ref(), config).await {
        warn!("Super admin bootstrap skipped: {}", e);
    }

    AppState::assemble(config.clone(), repos, providers, templates)
}

pub async fn seed_super_admin(admins: &dyn AdminRepository, config: &Config) -> Result<bool, AppError> {
    let (Some(email), Some(password)) = (&config.bootstrap_admin_email, &config.bootstrap_admin_password) else {
        return Ok(false);
    };
    if admins.count().await? > 0 {
        return Ok(false);
    }

    let admin = AdminUser::new(
        "Super Admin".to_string(),
        email.clone(),
        hash_password(password)?,
        Some(ROLE_SUPER_ADMIN.to_string()),
    );
    admins.create(&admin).await?;
    info!(admin_id = %admin.id, "Bootstrapped super admin {}", admin.email);
    Ok(true)
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
