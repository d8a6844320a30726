use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use yourway_backend::config::ForgeConfig;
use yourway_backend::domain::ports::ForgeService;
use yourway_backend::error::AppError;
use yourway_backend::infra::forge::github_service::GitHubForgeService;

const TOKEN: &str = "ghp_stub_token";
const CONFIG_FILE: &str = "const RestaurantID = \"template\";\nexport const BASE_URL = 'http://localhost';\n";

#[derive(Clone, Default)]
struct Recorded {
    /// (method, path, bearer header, json body)
    calls: Arc<Mutex<Vec<(String, String, Option<String>, Value)>>>,
}

impl Recorded {
    fn push(&self, method: &str, path: String, headers: &HeaderMap, body: Value) {
        let auth = headers.get("authorization").and_then(|v| v.to_str().ok()).map(str::to_string);
        self.calls.lock().unwrap().push((method.to_string(), path, auth, body));
    }
}

/// The contents API wraps base64 output at 60 columns.
fn wrapped_base64(content: &str) -> String {
    let encoded = STANDARD.encode(content);
    encoded.as_bytes().chunks(60).map(|c| std::str::from_utf8(c).unwrap()).collect::<Vec<_>>().join("\n")
}

async fn fork(
    State(rec): State<Recorded>,
    Path((owner, repo)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    rec.push("POST", format!("/repos/{}/{}/forks", owner, repo), &headers, body.clone());
    if body["name"] == "taken" {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"message": "Name already exists on this account"})));
    }
    let name = body["name"].as_str().unwrap_or_default().to_string();
    (StatusCode::ACCEPTED, Json(json!({
        "id": 4242,
        "name": name,
        "html_url": format!("https://github.com/{}/{}", owner, name)
    })))
}

async fn read_file(
    State(rec): State<Recorded>,
    Path((owner, repo, path)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    rec.push("GET", format!("/repos/{}/{}/contents/{}", owner, repo, path), &headers, Value::Null);
    if repo == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"})));
    }
    (StatusCode::OK, Json(json!({"sha": "blob-sha-1", "content": wrapped_base64(CONFIG_FILE), "encoding": "base64"})))
}

async fn write_file(
    State(rec): State<Recorded>,
    Path((owner, repo, path)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    rec.push("PUT", format!("/repos/{}/{}/contents/{}", owner, repo, path), &headers, body);
    (StatusCode::OK, Json(json!({"content": {"sha": "blob-sha-2"}})))
}

async fn start_stub() -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/repos/{owner}/{repo}/forks", post(fork))
        .route("/repos/{owner}/{repo}/contents/{*path}", get(read_file).put(write_file))
        .with_state(recorded.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), recorded)
}

fn client(api_base: &str) -> GitHubForgeService {
    GitHubForgeService::new(&ForgeConfig {
        token: TOKEN.to_string(),
        api_base: format!("{}/", api_base),
        owner: "YourWayApps".to_string(),
        template_repo: "restaurant-template".to_string(),
        app_config_path: "constants.js".to_string(),
    })
}

#[tokio::test]
async fn test_fork_into_the_owner_organization() {
    let (base, recorded) = start_stub().await;

    let fork = client(&base).fork_repository("restaurant-template", "restaurant-template-My-Cafe").await.unwrap();
    assert_eq!(fork.id, 4242);
    assert_eq!(fork.name, "restaurant-template-My-Cafe");
    assert_eq!(fork.html_url, "https://github.com/YourWayApps/restaurant-template-My-Cafe");

    let calls = recorded.calls.lock().unwrap();
    let (method, path, auth, body) = &calls[0];
    assert_eq!(method, "POST");
    assert_eq!(path, "/repos/YourWayApps/restaurant-template/forks");
    assert_eq!(auth.as_deref(), Some("Bearer ghp_stub_token"));
    assert_eq!(body["organization"], "YourWayApps");
    assert_eq!(body["default_branch_only"], true);
}

#[tokio::test]
async fn test_provider_errors_carry_the_provider_message() {
    let (base, _) = start_stub().await;

    let err = client(&base).fork_repository("restaurant-template", "taken").await.unwrap_err();
    match err {
        AppError::Upstream(msg) => {
            assert!(msg.starts_with("GitHub fork failed. Status: 422"), "{}", msg);
            assert!(msg.ends_with("Name already exists on this account"), "{}", msg);
        }
        other => panic!("expected upstream error, got {:?}", other),
    }

    let err = client(&base).get_file("missing", "constants.js").await.unwrap_err();
    assert!(matches!(err, AppError::Upstream(ref msg) if msg.contains("Not Found")));
}

#[tokio::test]
async fn test_file_reads_decode_wrapped_content() {
    let (base, _) = start_stub().await;

    let file = client(&base).get_file("restaurant-template-My-Cafe", "constants.js").await.unwrap();
    assert_eq!(file.sha, "blob-sha-1");
    assert_eq!(file.content, CONFIG_FILE);
}

#[tokio::test]
async fn test_updates_send_the_sha_and_creates_do_not() {
    let (base, recorded) = start_stub().await;
    let forge = client(&base);

    forge.update_file("fork", "constants.js", "Update RestaurantID", "new content", "blob-sha-1").await.unwrap();
    forge.create_file("fork", ".github/workflows/deploy.yml", "Deploy to Netlify", "on: push").await.unwrap();

    let calls = recorded.calls.lock().unwrap();
    let (_, path, _, update) = &calls[0];
    assert_eq!(path, "/repos/YourWayApps/fork/contents/constants.js");
    assert_eq!(update["sha"], "blob-sha-1");
    assert_eq!(update["message"], "Update RestaurantID");
    assert_eq!(STANDARD.decode(update["content"].as_str().unwrap()).unwrap(), b"new content");

    let (_, path, _, create) = &calls[1];
    assert_eq!(path, "/repos/YourWayApps/fork/contents/.github/workflows/deploy.yml");
    assert!(create.get("sha").is_none());
    assert_eq!(STANDARD.decode(create["content"].as_str().unwrap()).unwrap(), b"on: push");
}
