mod common;

use axum::http::StatusCode;
use common::{test_config, TestApp};
use serde_json::json;
use yourway_backend::domain::models::admin::{ROLE_ADMIN, ROLE_SUPER_ADMIN};
use yourway_backend::infra::factory::seed_super_admin;

#[tokio::test]
async fn test_admin_login() {
    let app = TestApp::new().await;
    let (admin_id, _) = app.seed_admin("ops@yourway.app", ROLE_ADMIN).await;

    let (status, body) = app.request("POST", "/api/admin/login", Some(json!({
        "email": "OPS@yourway.app", "password": "admin-password"
    })), None).await;
    assert_eq!(status, StatusCode::OK, "{:?}", body);

    let claims = app.state.auth_service.verify_token(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.sub, admin_id);
    assert_eq!(claims.role, ROLE_ADMIN);

    let (status, body) = app.request("POST", "/api/admin/login", Some(json!({
        "email": "ops@yourway.app", "password": "nope-nope"
    })), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid email or password");

    // Tenant credentials do not open the admin door.
    app.onboard("owner@shop.com", "Owner Shop").await;
    let (status, _) = app.request("POST", "/api/admin/login", Some(json!({
        "email": "owner@shop.com", "password": "secret123"
    })), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tenant_listing_requires_an_admin() {
    let app = TestApp::new().await;
    let (_, tenant_token) = app.onboard("owner@shop.com", "Owner Shop").await;
    let (_, admin_token) = app.seed_admin("ops@yourway.app", ROLE_ADMIN).await;

    let (status, _) = app.request("GET", "/api/getallusers", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.request("GET", "/api/getallusers", None, Some(&tenant_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied");

    let (status, _) = app.request("GET", "/api/getallusers", None, Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.request("GET", "/api/getallusers", None, Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "owner@shop.com");
    assert!(users[0].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_tenant_lifecycle() {
    let app = TestApp::new().await;
    let (tenant_id, _) = app.onboard("owner@shop.com", "Owner Shop").await;
    let (_, admin_token) = app.seed_admin("ops@yourway.app", ROLE_ADMIN).await;

    let (status, body) = app.request("GET", &format!("/api/getuser/{}", tenant_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["businessName"], "Owner Shop");
    assert!(body["restaurantID"].as_str().unwrap().starts_with("rest-"));

    let (status, body) = app.request("PUT", &format!("/api/updateuser/{}", tenant_id), Some(json!({
        "phone": "+1 555 0199",
        "businessAddress": {"street": "2 Side St", "city": "Shelbyville", "state": "IL", "zipCode": "62565", "country": "US"}
    })), Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK, "{:?}", body);
    assert_eq!(body["message"], "User updated successfully");
    assert_eq!(body["updatedUser"]["phone"], "+1 555 0199");
    assert_eq!(body["updatedUser"]["businessAddress"]["city"], "Shelbyville");

    let (status, _) = app.request("PUT", &format!("/api/updateuser/{}", tenant_id), Some(json!({
        "businessAddress": {"street": "2 Side St", "city": "", "state": "IL", "zipCode": "62565", "country": "US"}
    })), Some(&admin_token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.request("PUT", &format!("/api/deactivateuser/{}", tenant_id), None, Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["isActive"], false);

    let (_, active) = app.request("GET", "/api/getallusers", None, Some(&admin_token)).await;
    assert!(active.as_array().unwrap().is_empty());
    let (_, inactive) = app.request("GET", "/api/getdeactivatedusers", None, Some(&admin_token)).await;
    assert_eq!(inactive.as_array().unwrap().len(), 1);

    let (status, body) = app.request("DELETE", &format!("/api/deleteuser/{}", tenant_id), None, Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");

    let (status, body) = app.request("GET", &format!("/api/getuser/{}", tenant_id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let (status, _) = app.request("DELETE", &format!("/api/deleteuser/{}", tenant_id), None, Some(&admin_token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.request("PUT", "/api/deactivateuser/missing", None, Some(&admin_token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Provisioned resources outlive the account record.
    assert_eq!(app.forge.repo_names().len(), 1);
}

#[tokio::test]
async fn test_admin_accounts_crud() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.seed_admin("ops@yourway.app", ROLE_ADMIN).await;

    let (status, body) = app.request("POST", "/api/admins", Some(json!({
        "name": "Helper", "email": "helper@yourway.app", "password": "helper-pw"
    })), Some(&admin_token)).await;
    assert_eq!(status, StatusCode::CREATED, "{:?}", body);
    assert_eq!(body["newAdmin"]["role"], ROLE_ADMIN);
    assert!(body["newAdmin"].get("passwordHash").is_none());
    let helper_id = body["newAdmin"]["_id"].as_str().unwrap().to_string();

    let (status, body) = app.request("POST", "/api/admins", Some(json!({
        "name": "Helper", "email": "HELPER@yourway.app", "password": "helper-pw"
    })), Some(&admin_token)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Admin user already exists");

    let (status, _) = app.request("POST", "/api/admins", Some(json!({
        "name": "Odd", "email": "odd@yourway.app", "password": "odd-pw-1", "role": "owner"
    })), Some(&admin_token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.request("PUT", &format!("/api/admins/{}", helper_id), Some(json!({
        "name": "Helper Two", "password": "new-helper-pw"
    })), Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updatedAdmin"]["name"], "Helper Two");

    let (status, _) = app.request("POST", "/api/admin/login", Some(json!({
        "email": "helper@yourway.app", "password": "new-helper-pw"
    })), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.request("GET", "/api/admins", None, Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = app.request("DELETE", &format!("/api/admins/{}", helper_id), None, Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.request("GET", &format!("/api/admins/{}", helper_id), None, Some(&admin_token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Admin user not found");
}

#[tokio::test]
async fn test_super_admin_accounts_need_a_super_admin() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.seed_admin("ops@yourway.app", ROLE_ADMIN).await;
    let (root_id, root_token) = app.seed_admin("root@yourway.app", ROLE_SUPER_ADMIN).await;
    let (plain_id, _) = app.seed_admin("plain@yourway.app", ROLE_ADMIN).await;

    let super_payload = json!({
        "name": "Deputy", "email": "deputy@yourway.app", "password": "deputy-pw", "role": ROLE_SUPER_ADMIN
    });
    let (status, _) = app.request("POST", "/api/admins", Some(super_payload.clone()), Some(&admin_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.request("PUT", &format!("/api/admins/{}", plain_id), Some(json!({"role": ROLE_SUPER_ADMIN})), Some(&admin_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.request("PUT", &format!("/api/admins/{}", root_id), Some(json!({"name": "Renamed"})), Some(&admin_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.request("DELETE", &format!("/api/admins/{}", root_id), None, Some(&admin_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.request("POST", "/api/admins", Some(super_payload), Some(&root_token)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["newAdmin"]["role"], ROLE_SUPER_ADMIN);

    let (status, body) = app.request("PUT", &format!("/api/admins/{}", plain_id), Some(json!({"role": ROLE_SUPER_ADMIN})), Some(&root_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updatedAdmin"]["role"], ROLE_SUPER_ADMIN);

    let (status, body) = app.request("DELETE", &format!("/api/admins/{}", root_id), None, Some(&root_token)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Cannot delete yourself");
}

#[tokio::test]
async fn test_super_admin_bootstrap_runs_once() {
    let app = TestApp::new().await;
    let admins = app.state.admin_repo.as_ref();

    let mut config = test_config("sqlite::memory:");
    assert!(!seed_super_admin(admins, &config).await.unwrap());

    config.bootstrap_admin_email = Some("Boss@YourWay.app".to_string());
    config.bootstrap_admin_password = Some("boss-password".to_string());
    assert!(seed_super_admin(admins, &config).await.unwrap());
    assert!(!seed_super_admin(admins, &config).await.unwrap());

    let boss = app.state.admin_repo.find_by_email("boss@yourway.app").await.unwrap().unwrap();
    assert_eq!(boss.role, ROLE_SUPER_ADMIN);
    assert_eq!(app.state.admin_repo.count().await.unwrap(), 1);

    let (status, _) = app.request("POST", "/api/admin/login", Some(json!({
        "email": "boss@yourway.app", "password": "boss-password"
    })), None).await;
    assert_eq!(status, StatusCode::OK);
}
