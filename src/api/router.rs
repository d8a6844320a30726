use axum::{
    body::Body,
    extract::Request,
    http::{header::{AUTHORIZATION, CONTENT_TYPE}, HeaderValue, Method},
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{
    admin, auth, billing, health, onboarding_runs, registration, support, tenant_admin, verification,
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info, warn};
use uuid::Uuid;

const LOCAL_DASHBOARD_ORIGIN: &str = "http://localhost:3000";

fn cors_layer(client_url: &str) -> CorsLayer {
    let mut origins = Vec::new();
    for origin in [client_url, LOCAL_DASHBOARD_ORIGIN] {
        match origin.parse::<HeaderValue>() {
            Ok(value) if !origins.contains(&value) => origins.push(value),
            Ok(_) => {}
            Err(e) => warn!(origin = %origin, "Ignoring invalid CORS origin: {}", e),
        }
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Email verification
        .route("/api/send-mail", post(verification::send_mail))
        .route("/api/verify-code", post(verification::verify_code))

        // Tenant onboarding & session
        .route("/api/register", post(registration::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", get(auth::logout))
        .route("/api/onboarding-runs", get(onboarding_runs::list_runs))
        .route("/api/onboarding-runs/{id}", get(onboarding_runs::get_run))

        // Tenant management
        .route("/api/getallusers", get(tenant_admin::get_all_users))
        .route("/api/getdeactivatedusers", get(tenant_admin::get_deactivated_users))
        .route("/api/getuser/{id}", get(tenant_admin::get_user))
        .route("/api/updateuser/{id}", put(tenant_admin::update_user))
        .route("/api/deleteuser/{id}", delete(tenant_admin::delete_user))
        .route("/api/deactivateuser/{id}", put(tenant_admin::deactivate_user))

        // Billing
        .route("/api/create-checkout-session", post(billing::create_checkout_session))
        .route("/api/webhook", post(billing::webhook))

        // Admin accounts
        .route("/api/admin/login", post(admin::login))
        .route("/api/admin/logout", get(admin::logout))
        .route("/api/admins", get(admin::list_admins).post(admin::create_admin))
        .route("/api/admins/{id}", get(admin::get_admin).put(admin::update_admin).delete(admin::delete_admin))

        // Support
        .route("/api/support-tickets", get(support::list_tickets).post(support::create_ticket))
        .route("/api/support-tickets/user/{user_id}", get(support::list_tickets_by_user))
        .route("/api/support-tickets/{id}", get(support::get_ticket).put(support::update_ticket).delete(support::delete_ticket))
        .route("/api/support-tickets/{id}/messages", get(support::list_messages).post(support::post_message))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        tenant_id = tracing::field::Empty,
                        role = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .layer(cors_layer(&state.config.client_url))
        .with_state(state)
}
