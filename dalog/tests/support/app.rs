use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use dalog::config::SessionConfig;
use dalog::{api, db, AppState};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

/// テスト用JWTシークレット
#[allow(dead_code)]
pub const TEST_JWT_SECRET: &str = "contract-test-secret";

/// テスト用のルーターを作成する（.oneshot()スタイルのテスト用）
#[allow(dead_code)]
pub async fn create_test_app() -> (Router, SqlitePool) {
    let db_pool = create_test_db_pool().await;
    let state = AppState {
        db_pool: db_pool.clone(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        session: SessionConfig::default(),
    };
    (api::create_app(state), db_pool)
}

/// マイグレーション済みのインメモリDBを作成する
#[allow(dead_code)]
pub async fn create_test_db_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    db::migrations::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// パスワード付きのユーザーを作成する
#[allow(dead_code)]
pub async fn create_user(pool: &SqlitePool, username: &str, password: &str) -> i64 {
    let hash = dalog::auth::password::hash_password(password).unwrap();
    db::users::create(pool, username, &hash).await.unwrap().id
}

/// ログインしてレスポンスを返す
#[allow(dead_code)]
pub async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_vec(&json!({
                        "username": username,
                        "password": password
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

/// ログインしてトークンを返す
#[allow(dead_code)]
pub async fn login_token(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = login(app, username, password).await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

/// Bearerトークン付きでリクエストを送る
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
