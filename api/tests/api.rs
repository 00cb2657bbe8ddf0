use api::{
    auth::TokenService,
    config::Config,
    db::{DB, JsonFileStore, MemoryStore},
    routes,
    state::AppState,
};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const PASSWORD: &str = "Password1";

fn test_config() -> Config {
    Config {
        port: 0,
        production: false,
        jwt_secret: "integration-secret".to_string(),
        jwt_expiry: Duration::hours(1),
        users_db_path: ":memory:".into(),
        cors_origin: "http://localhost:4200".to_string(),
        rate_limit: false,
    }
}

struct TestApp {
    router: Router,
    tokens: TokenService,
}

impl TestApp {
    fn with_store(users: DB) -> Self {
        Self::with_config(test_config(), users)
    }

    fn with_config(config: Config, users: DB) -> Self {
        let tokens = TokenService::new(&config.jwt_secret, config.jwt_expiry);
        let state = AppState {
            users,
            tokens: tokens.clone(),
        };
        let router = routes::create_routes(state, &config).unwrap();
        Self { router, tokens }
    }

    fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::default()))
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn post(&self, uri: &str, body: Value, token: Option<&str>) -> (StatusCode, Value) {
        let mut req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(req.body(Body::from(body.to_string())).unwrap()).await
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut req = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(req.body(Body::empty()).unwrap()).await
    }

    async fn register(&self, email: &str, is_admin: bool) -> (StatusCode, Value) {
        self.post(
            "/register",
            json!({ "name": "Ada", "email": email, "password": PASSWORD, "isAdmin": is_admin }),
            None,
        )
        .await
    }

    /// Login attempt as seen coming through a proxy for `client_ip`.
    /// Only the status matters: the limiter answers 429 with a plain-text body.
    async fn login_from(&self, client_ip: &str) -> StatusCode {
        let req = Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", client_ip)
            .body(Body::from(
                json!({ "email": "nobody@example.com", "password": PASSWORD }).to_string(),
            ))
            .unwrap();
        self.router.clone().oneshot(req).await.unwrap().status()
    }

    /// Registers and logs in, returning (user id, token).
    async fn signed_in(&self, email: &str) -> (String, String) {
        let (status, _) = self.register(email, false).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .post("/login", json!({ "email": email, "password": PASSWORD }), None)
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        (
            body["userId"].as_str().unwrap().to_string(),
            body["token"].as_str().unwrap().to_string(),
        )
    }
}

#[tokio::test]
async fn register_returns_new_user_id() {
    let app = TestApp::new();
    let (status, body) = app.register("ada@example.com", false).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert!(!body["userId"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = TestApp::new();
    assert_eq!(app.register("ada@example.com", false).await.0, StatusCode::CREATED);

    let (status, body) = app.register("ada@example.com", true).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already in use.");
}

#[tokio::test]
async fn email_match_is_case_sensitive() {
    let app = TestApp::new();
    assert_eq!(app.register("ada@example.com", false).await.0, StatusCode::CREATED);
    assert_eq!(app.register("Ada@example.com", false).await.0, StatusCode::CREATED);
}

#[tokio::test]
async fn weak_password_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/register",
            json!({ "name": "Ada", "email": "ada@example.com", "password": "short1", "isAdmin": false }),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("1 uppercase letter"));
}

#[tokio::test]
async fn missing_fields_are_named() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/register",
            json!({ "name": "", "email": "ada@example.com", "password": PASSWORD, "isAdmin": false }),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Name is required");

    let (status, body) = app
        .post(
            "/register",
            json!({ "name": "Ada", "email": "ada@example.com", "password": PASSWORD }),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "isAdmin is required");

    let (status, body) = app.post("/login", json!({ "email": "ada@example.com" }), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Password is required");
}

#[tokio::test]
async fn malformed_json_is_a_json_validation_error() {
    let app = TestApp::new();
    let req = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let (status, body) = app.send(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn login_then_profile_returns_same_user() {
    let app = TestApp::new();
    let (user_id, token) = app.signed_in("ada@example.com").await;

    let (status, body) = app.get("/user", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user_id);
    assert_eq!(body["name"], "Ada");
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["isAdmin"], false);
    assert!(body.get("password").is_none());

    // "October 16, 2026, 09:15:02"
    let created = body["createdAt"].as_str().unwrap();
    assert_eq!(created.matches(", ").count(), 2, "{created}");
}

#[tokio::test]
async fn login_failures() {
    let app = TestApp::new();
    app.register("ada@example.com", false).await;

    let (status, body) = app
        .post("/login", json!({ "email": "nobody@example.com", "password": PASSWORD }), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User does not exist");

    let (status, body) = app
        .post("/login", json!({ "email": "ada@example.com", "password": "Password2" }), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn login_role_must_match_when_given() {
    let app = TestApp::new();
    app.register("user@example.com", false).await;
    app.register("admin@example.com", true).await;

    let (status, body) = app
        .post(
            "/login",
            json!({ "email": "user@example.com", "password": PASSWORD, "isAdmin": true }),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You are not an admin. Login as a normal user.");

    let (status, body) = app
        .post(
            "/login",
            json!({ "email": "admin@example.com", "password": PASSWORD, "isAdmin": false }),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You are not authorized to login as a normal user.");

    let (status, _) = app
        .post(
            "/login",
            json!({ "email": "admin@example.com", "password": PASSWORD, "isAdmin": true }),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn verify_token_outcomes() {
    let app = TestApp::new();
    let (user_id, token) = app.signed_in("ada@example.com").await;

    let (status, body) = app.get("/verify-token", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "isValid": true }));

    let (status, body) = app.get("/verify-token", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["isValid"], false);
    assert_eq!(body["message"], "No token provided");

    let (status, body) = app.get("/verify-token", Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");

    let expired = app
        .tokens
        .issue_at(&user_id, Utc::now() - Duration::hours(3))
        .unwrap();
    let (status, body) = app.get("/verify-token", Some(&expired)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["isValid"], false);
    assert_eq!(body["message"], "Token has expired");
}

#[tokio::test]
async fn non_bearer_scheme_is_invalid() {
    let app = TestApp::new();
    let req = Request::builder()
        .uri("/user")
        .header(header::AUTHORIZATION, "Basic YWRhOnBhc3M=")
        .body(Body::empty())
        .unwrap();

    let (status, body) = app.send(req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn schemeless_authorization_counts_as_no_token() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("ada@example.com").await;

    // A raw token without "Bearer " in front is never read.
    let req = Request::builder()
        .uri("/verify-token")
        .header(header::AUTHORIZATION, token)
        .body(Body::empty())
        .unwrap();

    let (status, body) = app.send(req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["isValid"], false);
    assert_eq!(body["message"], "No token provided");
}

#[tokio::test]
async fn login_is_throttled_per_client_ip() {
    let config = Config {
        rate_limit: true,
        ..test_config()
    };
    let app = TestApp::with_config(config, Arc::new(MemoryStore::default()));

    for _ in 0..5 {
        assert_eq!(app.login_from("198.51.100.7").await, StatusCode::BAD_REQUEST);
    }
    assert_eq!(app.login_from("198.51.100.7").await, StatusCode::TOO_MANY_REQUESTS);

    // Another client has its own bucket.
    assert_eq!(app.login_from("203.0.113.9").await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn valid_token_for_missing_user_is_not_found() {
    let app = TestApp::new();
    let token = app.tokens.issue("no-such-user").unwrap();

    let (status, body) = app.get("/user", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let (status, _) = app.get("/user/getBoxInfo", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn fresh_account_has_default_grid() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("ada@example.com").await;

    let (status, body) = app.get("/user/getBoxInfo", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "totalSquares": 100, "selectedSquares": [] }));
}

#[tokio::test]
async fn saved_selection_round_trips_without_duplicates() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("ada@example.com").await;

    let (status, body) = app
        .post(
            "/user/saveBoxInfo",
            json!({ "totalSquares": 20, "selectedSquares": [12, 3, 3, 0, 250], "isReset": false }),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    // No bounds check against totalSquares: 250 survives.
    let (_, body) = app.get("/user/getBoxInfo", Some(&token)).await;
    assert_eq!(body, json!({ "totalSquares": 20, "selectedSquares": [0, 3, 12, 250] }));
}

#[tokio::test]
async fn negative_grid_values_are_stored_as_sent() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("ada@example.com").await;

    let (status, body) = app
        .post(
            "/user/saveBoxInfo",
            json!({ "totalSquares": -5, "selectedSquares": [1, -2] }),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalSquares"], -5);

    let (_, body) = app.get("/user/getBoxInfo", Some(&token)).await;
    assert_eq!(body, json!({ "totalSquares": -5, "selectedSquares": [-2, 1] }));
}

#[tokio::test]
async fn reset_restores_defaults_regardless_of_payload() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("ada@example.com").await;

    app.post(
        "/user/saveBoxInfo",
        json!({ "totalSquares": 7, "selectedSquares": [1, 2], "isReset": false }),
        Some(&token),
    )
    .await;

    let (status, body) = app
        .post(
            "/user/saveBoxInfo",
            json!({ "totalSquares": 55, "selectedSquares": [9], "isReset": true }),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalSquares"], 100);
    assert_eq!(body["selectedSquares"], json!([]));

    let (_, body) = app.get("/user/getBoxInfo", Some(&token)).await;
    assert_eq!(body, json!({ "totalSquares": 100, "selectedSquares": [] }));
}

#[tokio::test]
async fn box_routes_require_a_token() {
    let app = TestApp::new();

    let (status, _) = app.get("/user/getBoxInfo", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post("/user/saveBoxInfo", json!({ "isReset": true }), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn accounts_persist_in_the_users_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("users").join("db.json");

    let first = TestApp::with_store(Arc::new(JsonFileStore::new(&path)));
    let (user_id, token) = first.signed_in("ada@example.com").await;
    first
        .post(
            "/user/saveBoxInfo",
            json!({ "totalSquares": 30, "selectedSquares": [4, 2] }),
            Some(&token),
        )
        .await;

    let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["users"][0]["id"], user_id);
    assert!(raw["users"][0]["password"].as_str().unwrap().starts_with("$argon2"));

    // A second process pointed at the same file sees the account and its grid.
    let second = TestApp::with_store(Arc::new(JsonFileStore::new(&path)));
    let (status, body) = second
        .post("/login", json!({ "email": "ada@example.com", "password": PASSWORD }), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();

    let (_, body) = second.get("/user/getBoxInfo", Some(token)).await;
    assert_eq!(body, json!({ "totalSquares": 30, "selectedSquares": [2, 4] }));
}

#[tokio::test]
async fn root_and_health() {
    let app = TestApp::new();

    let (status, body) = app.get("/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "API is up to date.");

    app.register("ada@example.com", false).await;
    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"], 1);
}
